use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, BookQuantity};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;

    /// Takes one copy out of stock and returns the remaining quantity.
    ///
    /// Fails with [`KernelError::OutOfStock`] when the quantity is already zero and
    /// with [`KernelError::BookNotFound`] when the book does not exist. The row stays
    /// locked until the transaction ends.
    async fn decrement_quantity(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError>;

    /// Puts one copy back. Unbounded.
    async fn increment_quantity(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
