use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into().trim().to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, other: &BookTitle) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

#[cfg(test)]
mod test {
    use super::BookTitle;

    #[test]
    fn matches_ignoring_case_and_padding() {
        let stored = BookTitle::new("Dune");
        assert!(stored.matches(&BookTitle::new("  dUNE ")));
        assert!(!stored.matches(&BookTitle::new("Dune Messiah")));
        assert!(BookTitle::new("   ").is_blank());
    }
}
