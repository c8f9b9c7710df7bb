use crate::entity::PasswordHash;
use crate::KernelError;

/// Credential rules and password hashing, kept outside the lending core.
///
/// Hashing and verification are slow on purpose; callers run them outside any
/// storage transaction.
#[async_trait::async_trait]
pub trait IdentityProvider: 'static + Sync + Send {
    fn validate_email_format(&self, email: &str) -> bool;
    fn validate_password_strength(&self, password: &str) -> bool;
    async fn hash_password(&self, password: &str) -> error_stack::Result<PasswordHash, KernelError>;
    async fn verify_password(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnIdentityProvider: 'static + Sync + Send {
    type IdentityProvider: IdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider;
}
