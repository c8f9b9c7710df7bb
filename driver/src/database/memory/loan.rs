use error_stack::Report;

use kernel::interface::query::LoanEventQuery;
use kernel::interface::update::LoanEventModifier;
use kernel::prelude::entity::{
    BookId, CreatedAt, LoanEvent, LoanEventId, LoanHistory, LoanKind, UserId,
};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryLoanEventRepository;

#[async_trait::async_trait]
impl LoanEventQuery for InMemoryLoanEventRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        Ok(con
            .working
            .events
            .iter()
            .filter(|event| event.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError> {
        Ok(con
            .working
            .events
            .iter()
            .filter(|event| event.book_id() == book_id)
            .cloned()
            .collect())
    }

    async fn find_history_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        let books = &con.working.books;
        con.working
            .events
            .iter()
            .filter(|event| event.user_id() == user_id)
            .map(|event| -> error_stack::Result<LoanHistory, KernelError> {
                let book = books
                    .iter()
                    .find(|book| book.id() == event.book_id())
                    .ok_or_else(|| {
                        Report::new(KernelError::Internal).attach_printable(format!(
                            "Loan event {:?} refers to a missing book",
                            event.id()
                        ))
                    })?;
                Ok(LoanHistory::new(
                    *event.id(),
                    *event.kind(),
                    event.created_at().clone(),
                    book.title().clone(),
                    book.author().clone(),
                ))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl LoanEventModifier for InMemoryLoanEventRepository {
    type Transaction = InMemoryTransaction;

    async fn append(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        book_id: &BookId,
        kind: LoanKind,
    ) -> error_stack::Result<LoanEvent, KernelError> {
        let state = &mut con.working;
        if !state.users.iter().any(|user| user.id() == user_id) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Loan event refers to missing user {:?}", user_id)));
        }
        if !state.books.iter().any(|book| book.id() == book_id) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Loan event refers to missing book {:?}", book_id)));
        }
        let id = LoanEventId::new(state.events.len() as i64 + 1);
        let event = LoanEvent::new(id, user_id.clone(), book_id.clone(), kind, CreatedAt::now());
        state.events.push(event.clone());
        Ok(event)
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::LoanEventQuery;
    use kernel::interface::update::{BookModifier, LoanEventModifier, UserModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookQuantity, BookTitle, LoanKind, PasswordHash, User,
        UserEmail, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::database::{
        InMemoryBookRepository, InMemoryDatabase, InMemoryLoanEventRepository,
        InMemoryUserRepository,
    };

    #[tokio::test]
    async fn append_assigns_increasing_ids() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let mut con = db.transact().await?;
        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Herbert"),
            BookQuantity::new(1),
        );
        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("reader"),
            UserEmail::new("reader@example.com"),
            PasswordHash::new("hash"),
        );
        InMemoryBookRepository.create(&mut con, &book).await?;
        InMemoryUserRepository.create(&mut con, &user).await?;

        let issued = InMemoryLoanEventRepository
            .append(&mut con, user.id(), book.id(), LoanKind::Issued)
            .await?;
        assert!(
            InMemoryLoanEventRepository
                .is_currently_issued(&mut con, user.id(), book.id())
                .await?
        );
        let returned = InMemoryLoanEventRepository
            .append(&mut con, user.id(), book.id(), LoanKind::Returned)
            .await?;
        assert!(returned.id() > issued.id());
        assert!(
            !InMemoryLoanEventRepository
                .has_outstanding_loan(&mut con, user.id())
                .await?
        );

        let history = InMemoryLoanEventRepository
            .find_history_by_user_id(&mut con, user.id())
            .await?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].title(), &BookTitle::new("Dune"));
        assert_eq!(history[1].kind(), &LoanKind::Returned);
        Ok(())
    }

    #[tokio::test]
    async fn append_requires_known_rows() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let mut con = db.transact().await?;
        let error = InMemoryLoanEventRepository
            .append(
                &mut con,
                &UserId::new(Uuid::new_v4()),
                &BookId::new(Uuid::new_v4()),
                LoanKind::Issued,
            )
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Internal);
        Ok(())
    }
}
