use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::Report;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::config::StorageConfig;
use crate::env;
use crate::error::ConvertError;

pub use self::{book::*, loan::*, user::*};

mod book;
mod loan;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const LOCK_NOT_AVAILABLE: &str = "55P03";
const UNIQUE_VIOLATION: &str = "23505";
const USERS_EMAIL_KEY: &str = "users_email_key";

const SCHEMA_LOCK_KEY: i64 = 0x6c656e64;

// language=postgresql
const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id         UUID PRIMARY KEY,
        title      TEXT        NOT NULL,
        author     TEXT        NOT NULL,
        quantity   INTEGER     NOT NULL CHECK (quantity >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS books_title_author_idx ON books (LOWER(title), LOWER(author))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id       UUID PRIMARY KEY,
        name     TEXT NOT NULL,
        email    TEXT NOT NULL,
        password TEXT NOT NULL,
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS loan_events (
        id         BIGSERIAL PRIMARY KEY,
        user_id    UUID        NOT NULL REFERENCES users (id),
        book_id    UUID        NOT NULL REFERENCES books (id),
        quantity   INTEGER     NOT NULL DEFAULT 1 CHECK (quantity = 1),
        kind       TEXT        NOT NULL CHECK (kind IN ('Issued', 'Returned')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS loan_events_user_idx ON loan_events (user_id, id)
    "#,
];

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    lock_timeout: Duration,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL).convert_error()?;
        let config = StorageConfig::from_env()?;
        Self::connect(&url, &config).await
    }

    /// Connects and creates the schema when it does not exist yet.
    pub async fn connect(
        url: &str,
        config: &StorageConfig,
    ) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(config.lock_timeout())
            .connect(url)
            .await
            .convert_error()?;
        let database = Self {
            pool,
            lock_timeout: config.lock_timeout(),
        };
        database.create_schema().await?;
        Ok(database)
    }

    async fn create_schema(&self) -> error_stack::Result<(), KernelError> {
        let mut transaction = self.pool.begin().await.convert_error()?;
        // language=postgresql
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *transaction)
            .await
            .convert_error()?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *transaction)
                .await
                .convert_error()?;
        }
        transaction.commit().await.convert_error()?;
        tracing::info!("Database schema is ready");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let mut transaction = self.pool.begin().await.convert_error()?;
        let statement = format!(
            "SET LOCAL lock_timeout = {}",
            self.lock_timeout.as_millis()
        );
        sqlx::query(&statement)
            .execute(&mut *transaction)
            .await
            .convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

/// One request-scoped transaction. Dropping it without commit rolls back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = classify(&error);
            if context == KernelError::Internal {
                tracing::error!("Unexpected database error: {error}");
            } else {
                tracing::debug!("Database error classified as {context:?}: {error}");
            }
            Report::from(error).change_context(context)
        })
    }
}

fn classify(error: &Error) -> KernelError {
    match error {
        Error::PoolTimedOut => KernelError::Busy,
        Error::Io(_) | Error::Tls(_) | Error::PoolClosed | Error::WorkerCrashed => {
            KernelError::StorageUnavailable
        }
        Error::Database(database) => match database.code().as_deref() {
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => KernelError::Conflict,
            Some(LOCK_NOT_AVAILABLE) => KernelError::Busy,
            Some(UNIQUE_VIOLATION) if database.constraint() == Some(USERS_EMAIL_KEY) => {
                KernelError::DuplicateEmail
            }
            _ => KernelError::Internal,
        },
        _ => KernelError::Internal,
    }
}
