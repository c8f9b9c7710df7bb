mod history;
mod id;
mod kind;

pub use self::{history::*, id::*, kind::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, CreatedAt, UserId};

/// One immutable ledger entry. Each event moves exactly one copy.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct LoanEvent {
    id: LoanEventId,
    user_id: UserId,
    book_id: BookId,
    kind: LoanKind,
    created_at: CreatedAt<LoanEvent>,
}

impl LoanEvent {
    pub const QUANTITY: i32 = 1;

    pub fn new(
        id: LoanEventId,
        user_id: UserId,
        book_id: BookId,
        kind: LoanKind,
        created_at: CreatedAt<LoanEvent>,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            kind,
            created_at,
        }
    }
}
