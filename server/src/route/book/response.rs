use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{BookDto, CirculationDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: Uuid,
    title: String,
    author: String,
    quantity: i32,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author: value.author,
            quantity: value.quantity,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse(BookResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CirculationResponse {
    #[serde(flatten)]
    book: BookResponse,
    on_loan: usize,
}

impl IntoResponse for CirculationResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<BookDto> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, output: BookDto) -> Self::To {
        CreatedResponse(BookResponse::from(output))
    }
}

impl Exhaust<Option<BookDto>> for Presenter {
    type To = Option<BookResponse>;
    fn emit(&self, output: Option<BookDto>) -> Self::To {
        output.map(BookResponse::from)
    }
}

impl Exhaust<Vec<BookDto>> for Presenter {
    type To = Json<Vec<BookResponse>>;
    fn emit(&self, output: Vec<BookDto>) -> Self::To {
        Json(output.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<Option<CirculationDto>> for Presenter {
    type To = Option<CirculationResponse>;
    fn emit(&self, output: Option<CirculationDto>) -> Self::To {
        output.map(|circulation| CirculationResponse {
            book: BookResponse::from(circulation.book),
            on_loan: circulation.on_loan,
        })
    }
}
