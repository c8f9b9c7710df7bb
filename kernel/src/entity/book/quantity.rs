use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookQuantity(i32);

impl BookQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    pub fn is_available(&self) -> bool {
        self.0 > 0
    }

    /// `None` when no copy is left.
    pub fn decremented(&self) -> Option<Self> {
        self.is_available().then(|| Self(self.0 - 1))
    }

    pub fn incremented(&self) -> Self {
        Self(self.0 + 1)
    }
}
