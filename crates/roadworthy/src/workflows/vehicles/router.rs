use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use crate::identity::{Principal, Role};
use crate::store::StoreError;
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::repository::UserStore;

use super::domain::VehicleId;
use super::repository::VehicleStore;
use super::service::{VehicleError, VehicleService};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterVehicleRequest {
    pub(crate) plate: String,
    #[serde(default)]
    pub(crate) alias: Option<String>,
}

/// Router builder exposing the vehicle registry endpoints.
pub fn vehicle_router<S>(service: Arc<VehicleService<S>>) -> Router
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    Router::new()
        .route(
            "/vehicles",
            get(list_mine_handler::<S>).post(register_handler::<S>),
        )
        .route("/vehicles/all", get(list_all_handler::<S>))
        .route(
            "/vehicles/:vehicle_id",
            get(get_handler::<S>).delete(remove_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<S>(
    principal: Principal,
    State(service): State<Arc<VehicleService<S>>>,
    axum::Json(payload): axum::Json<RegisterVehicleRequest>,
) -> Response
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    let now = Local::now().naive_local();
    match service.register(&principal.user_id, &payload.plate, payload.alias, now) {
        Ok(vehicle) => (StatusCode::CREATED, axum::Json(vehicle)).into_response(),
        Err(error) => vehicle_error_response(error),
    }
}

pub(crate) async fn list_mine_handler<S>(
    principal: Principal,
    State(service): State<Arc<VehicleService<S>>>,
) -> Response
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    match service.list_mine(&principal.user_id) {
        Ok(vehicles) => (StatusCode::OK, axum::Json(vehicles)).into_response(),
        Err(error) => vehicle_error_response(error),
    }
}

pub(crate) async fn list_all_handler<S>(
    principal: Principal,
    State(service): State<Arc<VehicleService<S>>>,
) -> Response
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.list_all() {
        Ok(vehicles) => (StatusCode::OK, axum::Json(vehicles)).into_response(),
        Err(error) => vehicle_error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    principal: Principal,
    State(service): State<Arc<VehicleService<S>>>,
    Path(vehicle_id): Path<String>,
) -> Response
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    match service.get_own(&principal.user_id, &VehicleId(vehicle_id)) {
        Ok(vehicle) => (StatusCode::OK, axum::Json(vehicle)).into_response(),
        Err(error) => vehicle_error_response(error),
    }
}

pub(crate) async fn remove_handler<S>(
    principal: Principal,
    State(service): State<Arc<VehicleService<S>>>,
    Path(vehicle_id): Path<String>,
) -> Response
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    match service.remove_own(&principal.user_id, &VehicleId(vehicle_id)) {
        Ok(vehicle) => (StatusCode::OK, axum::Json(vehicle)).into_response(),
        Err(error) => vehicle_error_response(error),
    }
}

fn vehicle_error_response(error: VehicleError) -> Response {
    let status = match &error {
        VehicleError::VehicleNotFound => StatusCode::NOT_FOUND,
        VehicleError::PlateTaken(_) => StatusCode::CONFLICT,
        VehicleError::InvalidPlate(_) | VehicleError::ActiveAppointments { .. } => {
            StatusCode::BAD_REQUEST
        }
        VehicleError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        VehicleError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        VehicleError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
