use error_stack::ResultExt;
use regex::Regex;

use kernel::interface::identity::IdentityProvider;
use kernel::prelude::entity::PasswordHash;
use kernel::KernelError;

use crate::env_or;
use crate::error::{ConvertError, DriverError};

static BCRYPT_COST: &str = "BCRYPT_COST";

const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";
const MIN_PASSWORD_LENGTH: usize = 8;
const PASSWORD_SYMBOLS: &str = r"@_!#$%^&*()<>?/\|}{~:";

/// Credential checks with bcrypt password hashes.
///
/// bcrypt runs on the blocking pool so a slow cost factor never stalls the
/// async workers.
#[derive(Debug, Clone)]
pub struct BcryptIdentityProvider {
    cost: u32,
    email: Regex,
}

impl BcryptIdentityProvider {
    pub fn new(cost: u32) -> error_stack::Result<Self, KernelError> {
        let email = Regex::new(EMAIL_PATTERN)
            .map_err(DriverError::from)
            .convert_error()?;
        Ok(Self { cost, email })
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let cost = env_or(BCRYPT_COST, bcrypt::DEFAULT_COST).convert_error()?;
        Self::new(cost)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for BcryptIdentityProvider {
    fn validate_email_format(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    fn validate_password_strength(&self, password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LENGTH
            && password.chars().any(char::is_uppercase)
            && password.chars().any(char::is_lowercase)
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
    }

    async fn hash_password(&self, password: &str) -> error_stack::Result<PasswordHash, KernelError> {
        let password = password.to_string();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(DriverError::from)
            .convert_error()?
            .map_err(DriverError::from)
            .convert_error()?;
        Ok(PasswordHash::new(hash))
    }

    async fn verify_password(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> error_stack::Result<bool, KernelError> {
        let password = password.to_string();
        let hash = hash.as_str().to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(DriverError::from)
            .convert_error()?
            .map_err(DriverError::from)
            .convert_error()
            .attach_printable("Stored password hash is unreadable")
    }
}
