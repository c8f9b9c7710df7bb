use error_stack::Report;

use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Env(#[from] dotenvy::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Blocking(#[from] tokio::task::JoinError),
}

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}
