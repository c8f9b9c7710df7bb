use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookAuthor, BookId, BookTitle, SelectLimit, SelectOffset};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    /// Every catalog entry matching the key case-insensitively, oldest first.
    async fn find_by_title_and_author(
        &self,
        con: &mut Self::Transaction,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Vec<Book>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError>;

    async fn find_available(
        &self,
        con: &mut Self::Transaction,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let found = self
            .find_by_title_and_author(con, title, author)
            .await?
            .into_iter()
            .find(|book| book.quantity().is_available());
        Ok(found)
    }

    async fn find_any(
        &self,
        con: &mut Self::Transaction,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let found = self
            .find_by_title_and_author(con, title, author)
            .await?
            .into_iter()
            .next();
        Ok(found)
    }
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
