use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use application::service::{IssueBookService, ReturnBookService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{LendingRequest, Transformer};
use self::response::Presenter;

mod request;
mod response;

pub trait LoanRouter {
    fn route_loan(self) -> Self;
}

impl LoanRouter for Router<AppModule> {
    fn route_loan(self) -> Self {
        self.route(
            "/loans/issue",
            post(
                |State(module): State<AppModule>, Json(req): Json<LendingRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.issue_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/return",
            post(
                |State(module): State<AppModule>, Json(req): Json<LendingRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.return_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
