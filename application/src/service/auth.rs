use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::identity::{DependOnIdentityProvider, IdentityProvider};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::prelude::entity::{User, UserEmail};
use kernel::KernelError;

use crate::transfer::CredentialDto;

#[async_trait::async_trait]
pub trait AuthenticateService:
    'static + Sync + Send + DependOnUserQuery + DependOnIdentityProvider
{
    /// Resolves the credential pair to a user.
    ///
    /// The lookup session is released before the password is verified, so no
    /// storage lock is held while bcrypt runs. Users never change once stored.
    /// An unknown email and a wrong password both fail with
    /// [`KernelError::InvalidCredentials`].
    async fn authenticate(&self, credential: &CredentialDto) -> error_stack::Result<User, KernelError> {
        let email = UserEmail::new(credential.email.as_str());
        let found = {
            let mut connection = self.database_connection().transact().await?;
            self.user_query().find_by_email(&mut connection, &email).await?
        };
        let Some(user) = found else {
            return Err(Report::new(KernelError::InvalidCredentials));
        };
        let verified = self
            .identity_provider()
            .verify_password(&credential.password, user.password())
            .await?;
        if !verified {
            return Err(Report::new(KernelError::InvalidCredentials));
        }
        Ok(user)
    }
}

impl<T> AuthenticateService for T where T: DependOnUserQuery + DependOnIdentityProvider {}
