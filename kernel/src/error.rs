use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    InvalidCredentials,
    DuplicateEmail,
    InvalidEmail,
    WeakPassword,
    InvalidBook,
    InvalidQuantity,
    BookNotFound,
    OutOfStock,
    OutstandingLoanExists,
    NoActiveLoan,
    /// A concurrent transition won the race for the same user or book.
    Conflict,
    /// A bounded wait for a connection or lock expired.
    Busy,
    StorageUnavailable,
    Internal,
}

impl KernelError {
    /// Stable machine-readable name, used by outer surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            KernelError::InvalidCredentials => "invalid_credentials",
            KernelError::DuplicateEmail => "duplicate_email",
            KernelError::InvalidEmail => "invalid_email",
            KernelError::WeakPassword => "weak_password",
            KernelError::InvalidBook => "invalid_book",
            KernelError::InvalidQuantity => "invalid_quantity",
            KernelError::BookNotFound => "book_not_found",
            KernelError::OutOfStock => "out_of_stock",
            KernelError::OutstandingLoanExists => "outstanding_loan_exists",
            KernelError::NoActiveLoan => "no_active_loan",
            KernelError::Conflict => "conflict",
            KernelError::Busy => "busy",
            KernelError::StorageUnavailable => "storage_unavailable",
            KernelError::Internal => "internal",
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidCredentials => write!(f, "Invalid user credentials"),
            KernelError::DuplicateEmail => write!(f, "Email is already registered"),
            KernelError::InvalidEmail => write!(f, "Invalid email format"),
            KernelError::WeakPassword => write!(
                f,
                "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter, a digit and a special character"
            ),
            KernelError::InvalidBook => write!(f, "Book title and author must not be blank"),
            KernelError::InvalidQuantity => write!(f, "Book quantity must be positive"),
            KernelError::BookNotFound => write!(f, "Book not found"),
            KernelError::OutOfStock => write!(f, "No copy of the book is available"),
            KernelError::OutstandingLoanExists => {
                write!(f, "User must return the outstanding book first")
            }
            KernelError::NoActiveLoan => write!(f, "Book is not issued to this user"),
            KernelError::Conflict => write!(f, "Concurrency error"),
            KernelError::Busy => write!(f, "Process timed out"),
            KernelError::StorageUnavailable => write!(f, "Storage is unavailable"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
