use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use application::service::{CreateUserService, GetLoanHistoryService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{CreateRequest, CredentialRequest, Transformer};
use self::response::Presenter;

mod request;
mod response;

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl UserRouter for Router<AppModule> {
    fn route_user(self) -> Self {
        self.route(
            "/users",
            post(
                |State(module): State<AppModule>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.create_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/history",
            post(
                |State(module): State<AppModule>, Json(req): Json<CredentialRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.get_user_history(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
