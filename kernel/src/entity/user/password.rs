use std::fmt::{Debug, Formatter};

use vodca::{AsRefln, Fromln};

/// Salted one-way hash of a user's password. Plain passwords are never stored.
#[derive(Clone, PartialEq, Eq, Fromln, AsRefln)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}
