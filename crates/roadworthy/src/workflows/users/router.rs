use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::identity::{Principal, Role};
use crate::store::StoreError;

use super::repository::UserStore;
use super::service::{UserDirectory, UserDirectoryError};

/// Router builder exposing the directory endpoints.
pub fn user_router<S>(service: Arc<UserDirectory<S>>) -> Router
where
    S: UserStore + 'static,
{
    Router::new()
        .route("/users/me", get(me_handler::<S>))
        .route("/users", get(list_handler::<S>))
        .with_state(service)
}

pub(crate) async fn me_handler<S>(
    principal: Principal,
    State(service): State<Arc<UserDirectory<S>>>,
) -> Response
where
    S: UserStore + 'static,
{
    match service.find(&principal.user_id) {
        Ok(user) => (StatusCode::OK, axum::Json(user)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    principal: Principal,
    State(service): State<Arc<UserDirectory<S>>>,
) -> Response
where
    S: UserStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.list() {
        Ok(users) => (StatusCode::OK, axum::Json(users)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

fn directory_error_response(error: UserDirectoryError) -> Response {
    let status = match &error {
        UserDirectoryError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        UserDirectoryError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        UserDirectoryError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
