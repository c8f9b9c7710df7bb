use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookAuthor(String);

impl BookAuthor {
    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into().trim().to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, other: &BookAuthor) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}
