use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::LoanEventQuery;
use kernel::interface::update::LoanEventModifier;
use kernel::prelude::entity::{
    BookAuthor, BookId, BookTitle, CreatedAt, LoanEvent, LoanEventId, LoanHistory, LoanKind,
    UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresLoanEventRepository;

#[async_trait::async_trait]
impl LoanEventQuery for PostgresLoanEventRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        PgLoanEventInternal::find_by_user_id(con, user_id).await
    }

    async fn find_by_book_id(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        PgLoanEventInternal::find_by_book_id(con, book_id).await
    }

    async fn find_history_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        PgLoanEventInternal::find_history_by_user_id(con, user_id).await
    }

    async fn has_outstanding_loan(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        PgLoanEventInternal::has_outstanding_loan(con, user_id).await
    }

    async fn is_currently_issued(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        PgLoanEventInternal::is_currently_issued(con, user_id, book_id).await
    }
}

#[async_trait::async_trait]
impl LoanEventModifier for PostgresLoanEventRepository {
    type Transaction = PostgresTransaction;

    async fn append(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        book_id: &BookId,
        kind: LoanKind,
    ) -> error_stack::Result<LoanEvent, KernelError> {
        PgLoanEventInternal::append(con, user_id, book_id, kind).await
    }
}

#[derive(sqlx::FromRow)]
struct LoanEventRow {
    id: i64,
    user_id: Uuid,
    book_id: Uuid,
    kind: String,
    created_at: OffsetDateTime,
}

impl TryFrom<LoanEventRow> for LoanEvent {
    type Error = Report<KernelError>;
    fn try_from(value: LoanEventRow) -> Result<Self, Self::Error> {
        Ok(LoanEvent::new(
            LoanEventId::new(value.id),
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            LoanKind::try_from(value.kind.as_str())?,
            CreatedAt::new(value.created_at),
        ))
    }
}

#[derive(sqlx::FromRow)]
struct LoanHistoryRow {
    id: i64,
    kind: String,
    created_at: OffsetDateTime,
    title: String,
    author: String,
}

impl TryFrom<LoanHistoryRow> for LoanHistory {
    type Error = Report<KernelError>;
    fn try_from(value: LoanHistoryRow) -> Result<Self, Self::Error> {
        Ok(LoanHistory::new(
            LoanEventId::new(value.id),
            LoanKind::try_from(value.kind.as_str())?,
            CreatedAt::new(value.created_at),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
        ))
    }
}

pub(in crate::database) struct PgLoanEventInternal;

impl PgLoanEventInternal {
    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        let rows = sqlx::query_as::<_, LoanEventRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, kind, created_at
            FROM loan_events
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(LoanEvent::try_from).collect()
    }

    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        let rows = sqlx::query_as::<_, LoanEventRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, kind, created_at
            FROM loan_events
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(LoanEvent::try_from).collect()
    }

    async fn find_history_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        let rows = sqlx::query_as::<_, LoanHistoryRow>(
            // language=postgresql
            r#"
            SELECT loan_events.id, loan_events.kind, loan_events.created_at, books.title, books.author
            FROM loan_events
            JOIN books ON books.id = loan_events.book_id
            WHERE loan_events.user_id = $1
            ORDER BY loan_events.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(LoanHistory::try_from).collect()
    }

    async fn has_outstanding_loan(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM (
                    SELECT DISTINCT ON (book_id) kind
                    FROM loan_events
                    WHERE user_id = $1
                    ORDER BY book_id, id DESC
                ) AS latest
                WHERE latest.kind = 'Issued'
            )
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn is_currently_issued(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        let latest = sqlx::query_scalar::<_, String>(
            // language=postgresql
            r#"
            SELECT kind
            FROM loan_events
            WHERE user_id = $1 AND book_id = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        match latest {
            Some(kind) => Ok(LoanKind::try_from(kind.as_str())? == LoanKind::Issued),
            None => Ok(false),
        }
    }

    async fn append(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
        kind: LoanKind,
    ) -> error_stack::Result<LoanEvent, KernelError> {
        let row = sqlx::query_as::<_, LoanEventRow>(
            // language=postgresql
            r#"
            INSERT INTO loan_events (user_id, book_id, quantity, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, book_id, kind, created_at
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .bind(LoanEvent::QUANTITY)
        .bind(kind.as_str())
        .fetch_one(con)
        .await
        .convert_error()?;
        LoanEvent::try_from(row)
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::LoanEventQuery;
    use kernel::interface::update::{BookModifier, LoanEventModifier, UserModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookQuantity, BookTitle, LoanKind, PasswordHash, User,
        UserEmail, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresLoanEventRepository,
        PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn ledger_tracks_latest_event() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Herbert"),
            BookQuantity::new(1),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("name"),
            UserEmail::new(format!("ledger{}@example.com", rand::random::<u32>())),
            PasswordHash::new("$2b$04$hash"),
        );
        PostgresUserRepository.create(&mut con, &user).await?;

        let issued = PostgresLoanEventRepository
            .append(&mut con, user.id(), book.id(), LoanKind::Issued)
            .await?;
        assert_eq!(issued.kind(), &LoanKind::Issued);
        assert!(
            PostgresLoanEventRepository
                .has_outstanding_loan(&mut con, user.id())
                .await?
        );
        assert!(
            PostgresLoanEventRepository
                .is_currently_issued(&mut con, user.id(), book.id())
                .await?
        );

        let returned = PostgresLoanEventRepository
            .append(&mut con, user.id(), book.id(), LoanKind::Returned)
            .await?;
        assert!(returned.id() > issued.id());
        assert!(
            !PostgresLoanEventRepository
                .has_outstanding_loan(&mut con, user.id())
                .await?
        );

        let history = PostgresLoanEventRepository
            .find_history_by_user_id(&mut con, user.id())
            .await?;
        let kinds = history.iter().map(|entry| *entry.kind()).collect::<Vec<_>>();
        assert_eq!(kinds, vec![LoanKind::Issued, LoanKind::Returned]);

        let events = PostgresLoanEventRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(events, vec![issued, returned]);

        con.roll_back().await?;
        Ok(())
    }
}
