use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{DependOnLoanEventQuery, LoanEventQuery};
use kernel::KernelError;

use crate::service::AuthenticateService;
use crate::transfer::{CredentialDto, LoanHistoryDto, UserDetailDto, UserDto};

#[async_trait::async_trait]
pub trait GetLoanHistoryService:
    'static + Sync + Send + AuthenticateService + DependOnLoanEventQuery
{
    /// Details of the authenticated user with every issue and return, oldest first.
    async fn get_user_history(
        &self,
        credential: CredentialDto,
    ) -> error_stack::Result<UserDetailDto, KernelError> {
        let user = self.authenticate(&credential).await?;

        let mut connection = self.database_connection().transact().await?;
        let history = self
            .loan_event_query()
            .find_history_by_user_id(&mut connection, user.id())
            .await?;

        Ok(UserDetailDto {
            user: UserDto::from(user),
            history: history.into_iter().map(LoanHistoryDto::from).collect(),
        })
    }
}

impl<T> GetLoanHistoryService for T where T: AuthenticateService + DependOnLoanEventQuery {}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::LoanKind;
    use kernel::KernelError;

    use crate::service::{GetLoanHistoryService, IssueBookService, ReturnBookService};
    use crate::test_module::{lending, TestModule};

    #[tokio::test]
    async fn history_is_oldest_first() {
        let module = TestModule::new();
        module.book("Dune", "Frank Herbert", 1).await;
        module.book("1984", "George Orwell", 1).await;
        let reader = module.user("reader@example.com").await;

        module.issue_book(lending(&reader, "Dune", "Frank Herbert")).await.unwrap();
        module.return_book(lending(&reader, "Dune", "Frank Herbert")).await.unwrap();
        module.issue_book(lending(&reader, "1984", "George Orwell")).await.unwrap();

        let detail = module.get_user_history(reader.credential()).await.unwrap();
        assert_eq!(detail.user.id, reader.id);
        assert_eq!(detail.user.email, "reader@example.com");

        let entries = detail
            .history
            .iter()
            .map(|entry| (entry.kind, entry.title.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                (LoanKind::Issued, "Dune"),
                (LoanKind::Returned, "Dune"),
                (LoanKind::Issued, "1984"),
            ]
        );
        assert!(detail.history.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[tokio::test]
    async fn history_needs_valid_credentials() {
        let module = TestModule::new();
        let mut reader = module.user("reader@example.com").await;
        reader.password = "Not#Mine99".to_string();

        let rejected = module.get_user_history(reader.credential()).await.unwrap_err();
        assert_eq!(rejected.current_context(), &KernelError::InvalidCredentials);
    }
}
