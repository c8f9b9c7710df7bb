mod author;
mod id;
mod quantity;
mod title;

pub use self::{author::*, id::*, quantity::*, title::*};
use destructure::{Destructure, Mutation};
use vodca::References;

/// A catalog entry. `quantity` counts the copies that can be issued right now.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    quantity: BookQuantity,
}

impl Book {
    pub fn new(id: BookId, title: BookTitle, author: BookAuthor, quantity: BookQuantity) -> Self {
        Self {
            id,
            title,
            author,
            quantity,
        }
    }

    /// Case-insensitive comparison on the (title, author) lookup key.
    pub fn is_titled(&self, title: &BookTitle, author: &BookAuthor) -> bool {
        self.title.matches(title) && self.author.matches(author)
    }
}
