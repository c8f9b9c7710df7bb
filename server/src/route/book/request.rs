use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{CreateBookDto, GetAllBookDto, GetBookDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    title: String,
    author: String,
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug)]
pub struct GetRequest {
    id: Uuid,
}

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            quantity: input.quantity,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetAllRequest> for Transformer {
    type To = GetAllBookDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetAllBookDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}
