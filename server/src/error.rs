use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use serde_json::json;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(error: &KernelError) -> StatusCode {
        match error {
            KernelError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            KernelError::InvalidEmail
            | KernelError::WeakPassword
            | KernelError::InvalidBook
            | KernelError::InvalidQuantity => StatusCode::UNPROCESSABLE_ENTITY,
            KernelError::BookNotFound => StatusCode::NOT_FOUND,
            KernelError::DuplicateEmail
            | KernelError::OutOfStock
            | KernelError::OutstandingLoanExists
            | KernelError::NoActiveLoan
            | KernelError::Conflict => StatusCode::CONFLICT,
            KernelError::Busy | KernelError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let error = *self.0.current_context();
        let status = Self::status(&error);
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let body = json!({
            "code": error.code(),
            "message": error.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;

    use kernel::KernelError;

    use crate::error::ErrorStatus;

    #[test]
    fn lending_failures_are_told_apart() {
        let status = |error: KernelError| ErrorStatus::from(Report::new(error)).into_response().status();
        assert_eq!(status(KernelError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(KernelError::BookNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(KernelError::OutOfStock), StatusCode::CONFLICT);
        assert_eq!(status(KernelError::Busy), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(KernelError::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
