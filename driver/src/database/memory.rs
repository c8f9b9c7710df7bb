use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Book, LoanEvent, User};
use kernel::KernelError;

use crate::config::StorageConfig;

pub use self::{book::*, loan::*, user::*};

mod book;
mod loan;
mod user;

#[derive(Debug, Default, Clone)]
struct MemoryState {
    books: Vec<Book>,
    users: Vec<User>,
    events: Vec<LoanEvent>,
}

/// Process-local store with a single writer at a time.
///
/// A transaction holds the store lock from `transact` until it is committed, rolled
/// back or dropped, and works on a private copy that replaces the shared state only
/// on commit. Transitions are therefore serializable and never partially visible.
#[derive(Clone)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    lock_timeout: Duration,
}

impl InMemoryDatabase {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            lock_timeout: config.lock_timeout(),
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new(&StorageConfig::default())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = tokio::time::timeout(self.lock_timeout, Arc::clone(&self.state).lock_owned())
            .await
            .map_err(|elapsed| {
                Report::new(elapsed)
                    .change_context(KernelError::Busy)
                    .attach_printable("Timed out waiting for the in-memory store")
            })?;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{Book, BookAuthor, BookId, BookQuantity, BookTitle};
    use kernel::KernelError;

    use crate::config::StorageConfig;
    use crate::database::{InMemoryBookRepository, InMemoryDatabase};

    fn book() -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Herbert"),
            BookQuantity::new(1),
        )
    }

    #[tokio::test]
    async fn writes_are_visible_only_after_commit() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let book = book();

        let mut con = db.transact().await?;
        InMemoryBookRepository.create(&mut con, &book).await?;
        con.roll_back().await?;

        let mut con = db.transact().await?;
        assert!(InMemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .is_none());
        InMemoryBookRepository.create(&mut con, &book).await?;
        drop(con);

        let mut con = db.transact().await?;
        assert!(InMemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .is_none());
        InMemoryBookRepository.create(&mut con, &book).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = InMemoryBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book));
        Ok(())
    }

    #[tokio::test]
    async fn waiting_for_the_store_is_bounded() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new(&StorageConfig::new(1, Duration::from_millis(20)));
        let _held = db.transact().await?;

        let error = db.transact().await.err().unwrap();
        assert_eq!(error.current_context(), &KernelError::Busy);
        Ok(())
    }
}
