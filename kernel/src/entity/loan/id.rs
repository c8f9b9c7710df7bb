use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Position in the ledger. Strictly increasing in append order.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct LoanEventId(i64);

impl LoanEventId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
