use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::identity::{Principal, Role};
use crate::store::{Store, StoreError};
use crate::workflows::vehicles::domain::VehicleId;

use super::domain::AppointmentId;
use super::service::{SchedulingError, SchedulingService};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateAppointmentRequest {
    pub(crate) vehicle_id: String,
    pub(crate) scheduled_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CancelAppointmentRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityQuery {
    #[serde(default)]
    pub(crate) from: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) to: Option<NaiveDate>,
}

/// Router builder exposing the appointment endpoints.
pub fn appointment_router<S>(service: Arc<SchedulingService<S>>) -> Router
where
    S: Store + 'static,
{
    Router::new()
        .route("/appointments", post(create_handler::<S>))
        .route("/appointments/mine", get(list_mine_handler::<S>))
        .route("/appointments/availability", get(availability_handler::<S>))
        .route(
            "/appointments/awaiting-inspection",
            get(awaiting_inspection_handler::<S>),
        )
        .route("/appointments/all", get(list_all_handler::<S>))
        .route(
            "/appointments/:appointment_id/confirm",
            patch(confirm_handler::<S>),
        )
        .route(
            "/appointments/:appointment_id/cancel",
            patch(cancel_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
    axum::Json(payload): axum::Json<CreateAppointmentRequest>,
) -> Response
where
    S: Store + 'static,
{
    let now = Local::now().naive_local();
    match service.create(
        &principal.user_id,
        &VehicleId(payload.vehicle_id),
        &payload.scheduled_at,
        now,
    ) {
        Ok(appointment) => (StatusCode::CREATED, axum::Json(appointment)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn list_mine_handler<S>(
    principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
) -> Response
where
    S: Store + 'static,
{
    match service.list_mine(&principal.user_id) {
        Ok(appointments) => (StatusCode::OK, axum::Json(appointments)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn confirm_handler<S>(
    _principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
    Path(appointment_id): Path<String>,
) -> Response
where
    S: Store + 'static,
{
    match service.confirm(&AppointmentId(appointment_id)) {
        Ok(appointment) => (StatusCode::OK, axum::Json(appointment)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn cancel_handler<S>(
    principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
    Path(appointment_id): Path<String>,
    axum::Json(payload): axum::Json<CancelAppointmentRequest>,
) -> Response
where
    S: Store + 'static,
{
    match service.cancel(
        &principal.user_id,
        &AppointmentId(appointment_id),
        payload.reason,
    ) {
        Ok(appointment) => (StatusCode::OK, axum::Json(appointment)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn availability_handler<S>(
    _principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
    Query(query): Query<AvailabilityQuery>,
) -> Response
where
    S: Store + 'static,
{
    let now = Local::now().naive_local();
    match service.availability(query.from, query.to, now) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn awaiting_inspection_handler<S>(
    _principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
) -> Response
where
    S: Store + 'static,
{
    match service.awaiting_inspection() {
        Ok(candidates) => (StatusCode::OK, axum::Json(candidates)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

pub(crate) async fn list_all_handler<S>(
    principal: Principal,
    State(service): State<Arc<SchedulingService<S>>>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.list_all() {
        Ok(appointments) => (StatusCode::OK, axum::Json(appointments)).into_response(),
        Err(error) => scheduling_error_response(error),
    }
}

fn scheduling_error_response(error: SchedulingError) -> Response {
    let status = match &error {
        SchedulingError::VehicleNotOwned => StatusCode::FORBIDDEN,
        SchedulingError::AppointmentNotFound => StatusCode::NOT_FOUND,
        SchedulingError::InvalidDate(_)
        | SchedulingError::DateInPast
        | SchedulingError::NoActiveTemplate
        | SchedulingError::NotPending
        | SchedulingError::AlreadyCancelled => StatusCode::BAD_REQUEST,
        SchedulingError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        SchedulingError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        SchedulingError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
