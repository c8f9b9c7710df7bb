use uuid::Uuid;

use kernel::prelude::entity::{Book, DestructBook};

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub quantity: i32,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            quantity,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            quantity: quantity.into(),
        }
    }
}

/// Stock of one catalog entry together with the copies currently on loan.
#[derive(Debug, Clone)]
pub struct CirculationDto {
    pub book: BookDto,
    pub on_loan: usize,
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub quantity: i32,
}

#[derive(Default)]
pub struct GetAllBookDto {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
