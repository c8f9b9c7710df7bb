use std::sync::atomic::{AtomicUsize, Ordering};

use error_stack::Report;
use uuid::Uuid;

use driver::database::{
    InMemoryBookRepository, InMemoryDatabase, InMemoryLoanEventRepository,
    InMemoryTransaction, InMemoryUserRepository,
};
use driver::identity::BcryptIdentityProvider;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::DependOnIdentityProvider;
use kernel::interface::query::{DependOnBookQuery, DependOnLoanEventQuery, DependOnUserQuery};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnLoanEventModifier, DependOnUserModifier,
};
use kernel::prelude::entity::{Book, BookId, BookQuantity};
use kernel::KernelError;

use crate::service::{CreateBookService, CreateUserService};
use crate::transfer::{BookDto, CreateBookDto, CreateUserDto, CredentialDto, LendingDto};

pub const PASSWORD: &str = "Secret#Pass1";

/// Services wired to the in-memory store with a cheap bcrypt cost.
pub struct TestModule {
    database: InMemoryDatabase,
    identity: BcryptIdentityProvider,
    books: ContendedBookModifier,
}

impl TestModule {
    pub fn new() -> Self {
        Self::with_lost_races(KernelError::Conflict, 0)
    }

    /// The first `losses` stock updates fail with `failure` before touching the store.
    pub fn with_lost_races(failure: KernelError, losses: usize) -> Self {
        Self {
            database: InMemoryDatabase::default(),
            identity: BcryptIdentityProvider::new(4).unwrap(),
            books: ContendedBookModifier {
                failure,
                losses: AtomicUsize::new(losses),
                attempts: AtomicUsize::new(0),
            },
        }
    }

    /// Stock updates attempted so far, lost ones included.
    pub fn stock_updates(&self) -> usize {
        self.books.attempts.load(Ordering::SeqCst)
    }

    pub async fn book(&self, title: &str, author: &str, quantity: i32) -> BookDto {
        self.create_book(CreateBookDto {
            title: title.to_string(),
            author: author.to_string(),
            quantity,
        })
        .await
        .unwrap()
    }

    pub async fn user(&self, email: &str) -> Reader {
        let user = self
            .create_user(CreateUserDto {
                name: "Reader".to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();
        Reader {
            id: user.id,
            email: user.email,
            password: PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reader {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

impl Reader {
    pub fn credential(&self) -> CredentialDto {
        CredentialDto {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

pub fn lending(reader: &Reader, title: &str, author: &str) -> LendingDto {
    LendingDto {
        credential: reader.credential(),
        title: title.to_string(),
        author: author.to_string(),
    }
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnIdentityProvider for TestModule {
    type IdentityProvider = BcryptIdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &self.identity
    }
}

impl DependOnBookQuery for TestModule {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for TestModule {
    type BookModifier = ContendedBookModifier;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

/// Stock updates against the in-memory store that can be made to lose races.
pub struct ContendedBookModifier {
    failure: KernelError,
    losses: AtomicUsize,
    attempts: AtomicUsize,
}

impl ContendedBookModifier {
    fn lose(&self) -> Option<Report<KernelError>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.losses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .ok()
            .map(|_| {
                Report::new(self.failure).attach_printable("Lost a race against another transition")
            })
    }
}

#[async_trait::async_trait]
impl BookModifier for ContendedBookModifier {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        InMemoryBookRepository.create(con, book).await
    }

    async fn decrement_quantity(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        if let Some(report) = self.lose() {
            return Err(report);
        }
        InMemoryBookRepository.decrement_quantity(con, book_id).await
    }

    async fn increment_quantity(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        if let Some(report) = self.lose() {
            return Err(report);
        }
        InMemoryBookRepository.increment_quantity(con, book_id).await
    }
}

impl DependOnUserQuery for TestModule {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for TestModule {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnLoanEventQuery for TestModule {
    type LoanEventQuery = InMemoryLoanEventRepository;
    fn loan_event_query(&self) -> &Self::LoanEventQuery {
        &InMemoryLoanEventRepository
    }
}

impl DependOnLoanEventModifier for TestModule {
    type LoanEventModifier = InMemoryLoanEventRepository;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier {
        &InMemoryLoanEventRepository
    }
}
