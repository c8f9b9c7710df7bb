use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::LoanEventDto;
use kernel::prelude::entity::LoanKind;

use crate::controller::Exhaust;
use crate::route::rfc3339;

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    id: i64,
    user_id: Uuid,
    book_id: Uuid,
    kind: LoanKind,
    created_at: String,
    remaining: i32,
}

impl IntoResponse for LoanResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<LoanEventDto> for Presenter {
    type To = LoanResponse;
    fn emit(&self, output: LoanEventDto) -> Self::To {
        LoanResponse {
            id: output.id,
            user_id: output.user_id,
            book_id: output.book_id,
            kind: output.kind,
            created_at: rfc3339(output.created_at),
            remaining: output.remaining,
        }
    }
}
