use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{PasswordHash, User, UserEmail, UserId, UserName};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_email(con, email).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::create(con, user).await
    }

    async fn lock(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::lock(con, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(
            UserId::new(row.id),
            UserName::new(row.name),
            UserEmail::new(row.email),
            PasswordHash::new(row.password),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_email(
        con: &mut PgConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn create(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.email().as_ref())
        .bind(user.password().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn lock(con: &mut PgConnection, user_id: &UserId) -> error_stack::Result<(), KernelError> {
        let locked = sqlx::query_scalar::<_, Uuid>(
            // language=postgresql
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        match locked {
            Some(_) => Ok(()),
            None => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("User {:?} vanished while locking", user_id))),
        }
    }
}
