use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{LoanHistoryDto, UserDetailDto, UserDto};
use kernel::prelude::entity::LoanKind;

use crate::controller::Exhaust;
use crate::route::rfc3339;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    id: Uuid,
    name: String,
    email: String,
}

impl From<UserDto> for UserResponse {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse(UserResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    kind: LoanKind,
    created_at: String,
    title: String,
    author: String,
}

impl From<LoanHistoryDto> for HistoryEntryResponse {
    fn from(value: LoanHistoryDto) -> Self {
        Self {
            kind: value.kind,
            created_at: rfc3339(value.created_at),
            title: value.title,
            author: value.author,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    user: UserResponse,
    history: Vec<HistoryEntryResponse>,
}

impl IntoResponse for UserDetailResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<UserDto> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, output: UserDto) -> Self::To {
        CreatedResponse(UserResponse::from(output))
    }
}

impl Exhaust<UserDetailDto> for Presenter {
    type To = UserDetailResponse;
    fn emit(&self, output: UserDetailDto) -> Self::To {
        UserDetailResponse {
            user: UserResponse::from(output.user),
            history: output
                .history
                .into_iter()
                .map(HistoryEntryResponse::from)
                .collect(),
        }
    }
}
