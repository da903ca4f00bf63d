use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use crate::identity::{Principal, Role};
use crate::store::{Store, StoreError};
use crate::workflows::checklist::domain::ItemId;
use crate::workflows::scheduling::domain::AppointmentId;

use super::domain::InspectionId;
use super::service::{InspectionError, InspectionService};

#[derive(Debug, Deserialize)]
pub(crate) struct StartInspectionRequest {
    pub(crate) appointment_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddScoreRequest {
    pub(crate) item_id: String,
    pub(crate) value: u8,
    #[serde(default)]
    pub(crate) note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FinalizeRequest {
    #[serde(default)]
    pub(crate) general_note: Option<String>,
}

/// Router builder exposing the inspection endpoints.
pub fn inspection_router<S>(service: Arc<InspectionService<S>>) -> Router
where
    S: Store + 'static,
{
    Router::new()
        .route("/inspections", post(create_handler::<S>))
        .route("/inspections/mine", get(list_mine_handler::<S>))
        .route("/inspections/all", get(list_all_handler::<S>))
        .route(
            "/inspections/by-appointment/:appointment_id",
            get(by_appointment_handler::<S>),
        )
        .route("/inspections/:inspection_id", get(get_handler::<S>))
        .route(
            "/inspections/:inspection_id/scores",
            post(add_score_handler::<S>),
        )
        .route(
            "/inspections/:inspection_id/finalize",
            post(finalize_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
    axum::Json(payload): axum::Json<StartInspectionRequest>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Inspector) {
        return denied.into_response();
    }

    let now = Local::now().naive_local();
    match service.create(
        &principal.user_id,
        &AppointmentId(payload.appointment_id),
        now,
    ) {
        Ok(inspection) => (StatusCode::CREATED, axum::Json(inspection)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn add_score_handler<S>(
    principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
    Path(inspection_id): Path<String>,
    axum::Json(payload): axum::Json<AddScoreRequest>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Inspector) {
        return denied.into_response();
    }

    match service.add_score(
        &principal.user_id,
        &InspectionId(inspection_id),
        &ItemId(payload.item_id),
        payload.value,
        payload.note,
    ) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn finalize_handler<S>(
    principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
    Path(inspection_id): Path<String>,
    axum::Json(payload): axum::Json<FinalizeRequest>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Inspector) {
        return denied.into_response();
    }

    match service.finalize(
        &principal.user_id,
        &InspectionId(inspection_id),
        payload.general_note,
    ) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    _principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
    Path(inspection_id): Path<String>,
) -> Response
where
    S: Store + 'static,
{
    match service.get(&InspectionId(inspection_id)) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn by_appointment_handler<S>(
    _principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
    Path(appointment_id): Path<String>,
) -> Response
where
    S: Store + 'static,
{
    match service.by_appointment(&AppointmentId(appointment_id)) {
        Ok(inspection) => (StatusCode::OK, axum::Json(inspection)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn list_mine_handler<S>(
    principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Inspector) {
        return denied.into_response();
    }

    match service.list_mine(&principal.user_id) {
        Ok(inspections) => (StatusCode::OK, axum::Json(inspections)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

pub(crate) async fn list_all_handler<S>(
    principal: Principal,
    State(service): State<Arc<InspectionService<S>>>,
) -> Response
where
    S: Store + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.list_all() {
        Ok(inspections) => (StatusCode::OK, axum::Json(inspections)).into_response(),
        Err(error) => inspection_error_response(error),
    }
}

fn inspection_error_response(error: InspectionError) -> Response {
    let status = match &error {
        InspectionError::AppointmentNotFound
        | InspectionError::InspectionNotFound
        | InspectionError::ItemNotInTemplate => StatusCode::NOT_FOUND,
        InspectionError::NotAssignedInspector => StatusCode::FORBIDDEN,
        InspectionError::AppointmentNotConfirmed
        | InspectionError::DuplicateInspection
        | InspectionError::TemplateIncomplete
        | InspectionError::InvalidScoreValue(_)
        | InspectionError::ScoresIncomplete(_) => StatusCode::BAD_REQUEST,
        InspectionError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        InspectionError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        InspectionError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
