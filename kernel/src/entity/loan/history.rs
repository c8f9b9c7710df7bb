use destructure::Destructure;
use vodca::References;

use crate::entity::{BookAuthor, BookTitle, CreatedAt, LoanEvent, LoanEventId, LoanKind};

/// A ledger entry joined with the catalog entry it refers to.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct LoanHistory {
    id: LoanEventId,
    kind: LoanKind,
    created_at: CreatedAt<LoanEvent>,
    title: BookTitle,
    author: BookAuthor,
}

impl LoanHistory {
    pub fn new(
        id: LoanEventId,
        kind: LoanKind,
        created_at: CreatedAt<LoanEvent>,
        title: BookTitle,
        author: BookAuthor,
    ) -> Self {
        Self {
            id,
            kind,
            created_at,
            title,
            author,
        }
    }
}
