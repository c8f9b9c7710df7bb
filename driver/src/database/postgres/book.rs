use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookQuantity, BookTitle, SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_title_and_author(
        &self,
        con: &mut PostgresTransaction,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_title_and_author(con, title, author).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn decrement_quantity(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        PgBookInternal::decrement_quantity(con, book_id).await
    }

    async fn increment_quantity(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        PgBookInternal::increment_quantity(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    quantity: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookQuantity::new(value.quantity),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, quantity
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_title_and_author(
        con: &mut PgConnection,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, quantity
            FROM books
            WHERE LOWER(title) = LOWER($1) AND LOWER(author) = LOWER($2)
            ORDER BY created_at, id
            "#,
        )
        .bind(title.as_ref())
        .bind(author.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, quantity
            FROM books
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.quantity().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn decrement_quantity(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        // The row lock taken here is held until commit, so concurrent issues of the
        // last copy re-evaluate `quantity > 0` after the winner commits.
        let remaining = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            UPDATE books
            SET quantity = quantity - 1
            WHERE id = $1 AND quantity > 0
            RETURNING quantity
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;
        if let Some(quantity) = remaining {
            return Ok(BookQuantity::new(quantity));
        }
        if Self::exists(con, book_id).await? {
            Err(Report::new(KernelError::OutOfStock))
        } else {
            Err(Report::new(KernelError::BookNotFound))
        }
    }

    async fn increment_quantity(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        let remaining = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            UPDATE books
            SET quantity = quantity + 1
            WHERE id = $1
            RETURNING quantity
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        remaining
            .map(BookQuantity::new)
            .ok_or_else(|| Report::new(KernelError::BookNotFound))
    }

    async fn exists(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }
}
