use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::Report;
use uuid::Uuid;

use application::service::{CreateBookService, GetBookService, GetCirculationService};
use kernel::KernelError;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{CreateRequest, GetAllRequest, GetRequest, Transformer};
use self::response::{BookResponse, CirculationResponse, CreatedResponse, Presenter};

mod request;
mod response;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.get_all_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(create_book),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .and_then(found::<BookResponse>)
                },
            ),
        )
        .route(
            "/books/:id/circulation",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_circulation(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .and_then(found::<CirculationResponse>)
                },
            ),
        )
    }
}

fn found<T>(res: Option<T>) -> Result<T, ErrorStatus> {
    res.ok_or_else(|| ErrorStatus::from(Report::new(KernelError::BookNotFound)))
}

async fn create_book(
    State(module): State<AppModule>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(req): Json<CreateRequest>,
) -> Result<CreatedResponse, ErrorStatus> {
    let authorized = bearer.is_some_and(|TypedHeader(header)| module.is_admin(header.token()));
    if !authorized {
        return Err(ErrorStatus::from(
            Report::new(KernelError::InvalidCredentials)
                .attach_printable("Adding books requires the admin token"),
        ));
    }

    Controller::new(Transformer, Presenter)
        .intake(req)
        .handle(|dto| async move { module.create_book(dto).await })
        .await
        .map_err(ErrorStatus::from)
}

#[cfg(test)]
mod test {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::found;

    #[tokio::test]
    async fn missing_book_has_an_error_body() {
        let response = found::<()>(None).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "book_not_found");
    }
}
