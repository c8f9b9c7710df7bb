use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::identity::{DependOnIdentityProvider, IdentityProvider};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{User, UserEmail, UserId, UserName};
use kernel::KernelError;

use crate::transfer::{CreateUserDto, UserDto};

#[async_trait::async_trait]
pub trait CreateUserService:
    'static + Sync + Send + DependOnUserQuery + DependOnUserModifier + DependOnIdentityProvider
{
    /// Registers a borrower. Every failed format check is reported, the email first.
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let email = dto.email.trim();
        let identity = self.identity_provider();

        let mut rejected: Option<Report<KernelError>> = None;
        if !identity.validate_email_format(email) {
            rejected = Some(Report::new(KernelError::InvalidEmail)
                .attach_printable("Email must look like name@domain.tld"));
        }
        if !identity.validate_password_strength(&dto.password) {
            let weak = Report::new(KernelError::WeakPassword).attach_printable(
                "Password needs 8+ characters with upper and lower case letters, a digit and a symbol",
            );
            match rejected.as_mut() {
                Some(report) => report.extend_one(weak),
                None => rejected = Some(weak),
            }
        }
        if let Some(report) = rejected {
            return Err(report);
        }

        let password = identity.hash_password(&dto.password).await?;
        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new(dto.name),
            UserEmail::new(email),
            password,
        );

        let mut connection = self.database_connection().transact().await?;
        if self
            .user_query()
            .find_by_email(&mut connection, user.email())
            .await?
            .is_some()
        {
            return Err(Report::new(KernelError::DuplicateEmail));
        }
        self.user_modifier().create(&mut connection, &user).await?;
        connection.commit().await?;

        tracing::info!(user_id = %user.id().as_ref(), "User registered");
        Ok(UserDto::from(user))
    }
}

impl<T> CreateUserService for T where
    T: DependOnUserQuery + DependOnUserModifier + DependOnIdentityProvider
{
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use crate::service::CreateUserService;
    use crate::test_module::{TestModule, PASSWORD};
    use crate::transfer::CreateUserDto;

    fn user(email: &str, password: &str) -> CreateUserDto {
        CreateUserDto {
            name: "Reader".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn email_is_unique() {
        let module = TestModule::new();
        let created = module
            .create_user(user("  reader@example.com ", PASSWORD))
            .await
            .unwrap();
        assert_eq!(created.email, "reader@example.com");

        let duplicate = module
            .create_user(user("reader@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(duplicate.current_context(), &KernelError::DuplicateEmail);
    }

    #[tokio::test]
    async fn credentials_are_checked_before_storing() {
        let module = TestModule::new();

        let email = module
            .create_user(user("reader.example.com", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(email.current_context(), &KernelError::InvalidEmail);

        let weak = module
            .create_user(user("reader@example.com", "password"))
            .await
            .unwrap_err();
        assert_eq!(weak.current_context(), &KernelError::WeakPassword);

        let both = module
            .create_user(user("reader@", "short"))
            .await
            .unwrap_err();
        let contexts = both
            .frames()
            .filter_map(|frame| frame.downcast_ref::<KernelError>())
            .copied()
            .collect::<Vec<_>>();
        assert!(contexts.contains(&KernelError::InvalidEmail));
        assert!(contexts.contains(&KernelError::WeakPassword));

        // nothing was stored by the rejected attempts
        module
            .create_user(user("reader@example.com", PASSWORD))
            .await
            .unwrap();
    }
}
