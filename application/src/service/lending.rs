use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnLoanEventQuery, LoanEventQuery,
};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnLoanEventModifier, DependOnUserModifier,
    LoanEventModifier, UserModifier,
};
use kernel::prelude::entity::{Book, BookAuthor, BookQuantity, BookTitle, LoanKind, User};
use kernel::KernelError;

use crate::service::AuthenticateService;
use crate::transfer::{LendingDto, LoanEventDto};

/// Everything an issue or return transition touches.
pub trait DependOnLending:
    'static
    + Sync
    + Send
    + AuthenticateService
    + DependOnUserModifier
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnLoanEventQuery
    + DependOnLoanEventModifier
{
}

impl<T> DependOnLending for T where
    T: AuthenticateService
        + DependOnUserModifier
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnLoanEventQuery
        + DependOnLoanEventModifier
{
}

#[async_trait::async_trait]
pub trait IssueBookService: 'static + Sync + Send + DependOnLending {
    /// Lends one copy of the matching book to the authenticated user.
    ///
    /// Inventory and ledger change in one transaction. A lost race against a
    /// concurrent transition is retried once before `Conflict` is reported.
    async fn issue_book(&self, dto: LendingDto) -> error_stack::Result<LoanEventDto, KernelError> {
        let user = self.authenticate(&dto.credential).await?;
        match issue_once(self, &user, &dto).await {
            Err(report) if report.current_context() == &KernelError::Conflict => {
                tracing::warn!("Issue conflicted with a concurrent transition, retrying");
                issue_once(self, &user, &dto).await
            }
            outcome => outcome,
        }
    }
}

impl<T> IssueBookService for T where T: DependOnLending {}

#[async_trait::async_trait]
pub trait ReturnBookService: 'static + Sync + Send + DependOnLending {
    /// Takes back the copy the authenticated user holds.
    ///
    /// Same transaction and retry rules as [`IssueBookService::issue_book`].
    async fn return_book(&self, dto: LendingDto) -> error_stack::Result<LoanEventDto, KernelError> {
        let user = self.authenticate(&dto.credential).await?;
        match return_once(self, &user, &dto).await {
            Err(report) if report.current_context() == &KernelError::Conflict => {
                tracing::warn!("Return conflicted with a concurrent transition, retrying");
                return_once(self, &user, &dto).await
            }
            outcome => outcome,
        }
    }
}

impl<T> ReturnBookService for T where T: DependOnLending {}

// Any early exit drops the transaction and discards its writes.
async fn issue_once<T>(
    module: &T,
    user: &User,
    dto: &LendingDto,
) -> error_stack::Result<LoanEventDto, KernelError>
where
    T: DependOnLending + ?Sized,
{
    let mut connection = module.database_connection().transact().await?;
    module.user_modifier().lock(&mut connection, user.id()).await?;

    if module
        .loan_event_query()
        .has_outstanding_loan(&mut connection, user.id())
        .await?
    {
        return Err(Report::new(KernelError::OutstandingLoanExists));
    }

    let title = BookTitle::new(dto.title.as_str());
    let author = BookAuthor::new(dto.author.as_str());
    let (book, remaining) = take_copy(module, &mut connection, &title, &author).await?;
    let event = module
        .loan_event_modifier()
        .append(&mut connection, user.id(), book.id(), LoanKind::Issued)
        .await?;

    connection.commit().await?;

    tracing::info!(
        user_id = %user.id().as_ref(),
        book_id = %book.id().as_ref(),
        remaining = i32::from(remaining),
        "Book issued"
    );
    Ok(LoanEventDto::new(event, remaining))
}

// The entry picked first may be drained by a concurrent issue before its row
// lock is granted. The lookup then runs once more, so a duplicate entry that
// still has stock is used instead.
async fn take_copy<T>(
    module: &T,
    connection: &mut <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction,
    title: &BookTitle,
    author: &BookAuthor,
) -> error_stack::Result<(Book, BookQuantity), KernelError>
where
    T: DependOnLending + ?Sized,
{
    let Some(book) = module
        .book_query()
        .find_available(connection, title, author)
        .await?
    else {
        let cataloged = module
            .book_query()
            .find_any(connection, title, author)
            .await?
            .is_some();
        return Err(Report::new(if cataloged {
            KernelError::OutOfStock
        } else {
            KernelError::BookNotFound
        }));
    };

    match module
        .book_modifier()
        .decrement_quantity(connection, book.id())
        .await
    {
        Ok(remaining) => Ok((book, remaining)),
        Err(report) if report.current_context() == &KernelError::OutOfStock => {
            tracing::debug!(book_id = %book.id().as_ref(), "Entry ran out of stock, looking again");
            let Some(other) = module
                .book_query()
                .find_available(connection, title, author)
                .await?
            else {
                return Err(report);
            };
            let remaining = module
                .book_modifier()
                .decrement_quantity(connection, other.id())
                .await?;
            Ok((other, remaining))
        }
        Err(report) => Err(report),
    }
}

async fn return_once<T>(
    module: &T,
    user: &User,
    dto: &LendingDto,
) -> error_stack::Result<LoanEventDto, KernelError>
where
    T: DependOnLending + ?Sized,
{
    let mut connection = module.database_connection().transact().await?;
    module.user_modifier().lock(&mut connection, user.id()).await?;

    let title = BookTitle::new(dto.title.as_str());
    let author = BookAuthor::new(dto.author.as_str());
    let candidates = module
        .book_query()
        .find_by_title_and_author(&mut connection, &title, &author)
        .await?;
    if candidates.is_empty() {
        return Err(Report::new(KernelError::BookNotFound));
    }

    let mut held = None;
    for book in candidates {
        if module
            .loan_event_query()
            .is_currently_issued(&mut connection, user.id(), book.id())
            .await?
        {
            held = Some(book);
            break;
        }
    }
    let Some(book) = held else {
        return Err(Report::new(KernelError::NoActiveLoan));
    };

    let remaining = module
        .book_modifier()
        .increment_quantity(&mut connection, book.id())
        .await?;
    let event = module
        .loan_event_modifier()
        .append(&mut connection, user.id(), book.id(), LoanKind::Returned)
        .await?;

    connection.commit().await?;

    tracing::info!(
        user_id = %user.id().as_ref(),
        book_id = %book.id().as_ref(),
        remaining = i32::from(remaining),
        "Book returned"
    );
    Ok(LoanEventDto::new(event, remaining))
}
