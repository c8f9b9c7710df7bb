use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresBookRepository, PostgresDatabase, PostgresLoanEventRepository,
    PostgresUserRepository,
};
use driver::env;
use driver::identity::BcryptIdentityProvider;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::DependOnIdentityProvider;
use kernel::interface::query::{DependOnBookQuery, DependOnLoanEventQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnLoanEventModifier, DependOnUserModifier,
};
use kernel::KernelError;

static ADMIN_TOKEN: &str = "ADMIN_TOKEN";

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    identity: BcryptIdentityProvider,
    admin_token: Option<String>,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let identity = BcryptIdentityProvider::from_env()?;
        let admin_token = env(ADMIN_TOKEN).ok().filter(|token| !token.is_empty());
        if admin_token.is_none() {
            tracing::warn!("{ADMIN_TOKEN} is not set, adding books is disabled");
        }

        Ok(Self {
            pgpool,
            identity,
            admin_token,
        })
    }

    pub fn is_admin(&self, token: &str) -> bool {
        self.admin_token
            .as_deref()
            .is_some_and(|expected| expected == token)
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnIdentityProvider for Handler {
    type IdentityProvider = BcryptIdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &self.identity
    }
}

impl DependOnBookQuery for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for Handler {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnLoanEventQuery for Handler {
    type LoanEventQuery = PostgresLoanEventRepository;
    fn loan_event_query(&self) -> &Self::LoanEventQuery {
        &PostgresLoanEventRepository
    }
}

impl DependOnLoanEventModifier for Handler {
    type LoanEventModifier = PostgresLoanEventRepository;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier {
        &PostgresLoanEventRepository
    }
}
