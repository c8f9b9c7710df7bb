use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{
    BookQuantity, DestructLoanEvent, DestructLoanHistory, LoanEvent, LoanHistory, LoanKind,
};

use crate::transfer::{CredentialDto, UserDto};

/// Issue or return request for the book matching `title` and `author`.
#[derive(Clone)]
pub struct LendingDto {
    pub credential: CredentialDto,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct LoanEventDto {
    pub id: i64,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub kind: LoanKind,
    pub created_at: OffsetDateTime,
    /// Copies left on the shelf after this event.
    pub remaining: i32,
}

impl LoanEventDto {
    pub fn new(event: LoanEvent, remaining: BookQuantity) -> Self {
        let DestructLoanEvent {
            id,
            user_id,
            book_id,
            kind,
            created_at,
        } = event.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            book_id: book_id.into(),
            kind,
            created_at: created_at.into(),
            remaining: remaining.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoanHistoryDto {
    pub id: i64,
    pub kind: LoanKind,
    pub created_at: OffsetDateTime,
    pub title: String,
    pub author: String,
}

impl From<LoanHistory> for LoanHistoryDto {
    fn from(value: LoanHistory) -> Self {
        let DestructLoanHistory {
            id,
            kind,
            created_at,
            title,
            author,
        } = value.into_destruct();
        Self {
            id: id.into(),
            kind,
            created_at: created_at.into(),
            title: title.into(),
            author: author.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserDetailDto {
    pub user: UserDto,
    pub history: Vec<LoanHistoryDto>,
}
