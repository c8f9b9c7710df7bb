use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::event::BookCirculation;
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnLoanEventQuery, LoanEventQuery,
};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookQuantity, BookTitle, SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::transfer::{BookDto, CirculationDto, CreateBookDto, GetAllBookDto, GetBookDto};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&mut connection, &id).await?;

        Ok(book.map(BookDto::from))
    }

    async fn get_all_books(
        &self,
        dto: GetAllBookDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let limit = dto.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = dto.offset.map(SelectOffset::new).unwrap_or_default();
        let books = self
            .book_query()
            .find_all(&mut connection, &limit, &offset)
            .await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait GetCirculationService:
    'static + Sync + Send + DependOnBookQuery + DependOnLoanEventQuery
{
    async fn get_circulation(
        &self,
        dto: GetBookDto,
    ) -> error_stack::Result<Option<CirculationDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let Some(book) = self.book_query().find_by_id(&mut connection, &id).await? else {
            return Ok(None);
        };
        let events = self
            .loan_event_query()
            .find_by_book_id(&mut connection, &id)
            .await?;
        let circulation = BookCirculation::replay(&events);

        Ok(Some(CirculationDto {
            book: BookDto::from(book),
            on_loan: circulation.outstanding(),
        }))
    }
}

impl<T> GetCirculationService for T where T: DependOnBookQuery + DependOnLoanEventQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    /// Adds a new catalog entry. Entries sharing a title and author are kept apart.
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let title = BookTitle::new(dto.title);
        let author = BookAuthor::new(dto.author);
        if title.is_blank() || author.is_blank() {
            return Err(Report::new(KernelError::InvalidBook)
                .attach_printable("Title and author must not be blank"));
        }
        if dto.quantity <= 0 {
            return Err(Report::new(KernelError::InvalidQuantity)
                .attach_printable(format!("Quantity must be positive: {}", dto.quantity)));
        }

        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            title,
            author,
            BookQuantity::new(dto.quantity),
        );

        let mut connection = self.database_connection().transact().await?;
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::info!(book_id = %book.id().as_ref(), "Book added to the catalog");
        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use crate::service::{CreateBookService, GetBookService};
    use crate::test_module::TestModule;
    use crate::transfer::{CreateBookDto, GetAllBookDto, GetBookDto};

    fn book(title: &str, author: &str, quantity: i32) -> CreateBookDto {
        CreateBookDto {
            title: title.to_string(),
            author: author.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn books_need_a_title_an_author_and_copies() {
        let module = TestModule::new();

        let blank = module.create_book(book("  ", "Frank Herbert", 1)).await.unwrap_err();
        assert_eq!(blank.current_context(), &KernelError::InvalidBook);

        let empty = module.create_book(book("Dune", "Frank Herbert", 0)).await.unwrap_err();
        assert_eq!(empty.current_context(), &KernelError::InvalidQuantity);

        let all = module.get_all_books(GetAllBookDto::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn same_title_is_kept_as_separate_entries() {
        let module = TestModule::new();
        let first = module.create_book(book(" Dune ", "Frank Herbert", 2)).await.unwrap();
        let second = module.create_book(book("Dune", "Frank Herbert", 1)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.title, "Dune");

        let found = module
            .get_book(GetBookDto { id: second.id })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.quantity, 1);

        let page = module
            .get_all_books(GetAllBookDto {
                limit: Some(1),
                offset: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, second.id);
    }
}
