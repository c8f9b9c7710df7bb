use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookQuantity, BookTitle, SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.working.books.iter().find(|book| book.id() == id).cloned())
    }

    async fn find_by_title_and_author(
        &self,
        con: &mut InMemoryTransaction,
        title: &BookTitle,
        author: &BookAuthor,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con
            .working
            .books
            .iter()
            .filter(|book| book.is_titled(title, author))
            .cloned()
            .collect())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let skip = usize::try_from(*offset.as_ref()).unwrap_or(usize::MAX);
        let take = usize::try_from(*limit.as_ref()).unwrap_or(0);
        Ok(con
            .working
            .books
            .iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.working.books.push(book.clone());
        Ok(())
    }

    async fn decrement_quantity(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        let book = find_mut(con, book_id)?;
        let remaining = book
            .quantity()
            .decremented()
            .ok_or_else(|| Report::new(KernelError::OutOfStock))?;
        book.substitute(|book| *book.quantity = remaining);
        Ok(remaining)
    }

    async fn increment_quantity(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<BookQuantity, KernelError> {
        let book = find_mut(con, book_id)?;
        let remaining = book.quantity().incremented();
        book.substitute(|book| *book.quantity = remaining);
        Ok(remaining)
    }
}

fn find_mut<'a>(
    con: &'a mut InMemoryTransaction,
    book_id: &BookId,
) -> error_stack::Result<&'a mut Book, KernelError> {
    con.working
        .books
        .iter_mut()
        .find(|book| book.id() == book_id)
        .ok_or_else(|| Report::new(KernelError::BookNotFound))
}
