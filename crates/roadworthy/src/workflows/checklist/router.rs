use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use crate::identity::{Principal, Role};
use crate::store::StoreError;
use crate::workflows::scheduling::repository::AppointmentStore;

use super::domain::{ItemId, TemplateId};
use super::repository::TemplateStore;
use super::service::{ChecklistError, ChecklistService, TemplateUpdate};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTemplateRequest {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemRequest {
    pub(crate) label: String,
    pub(crate) ord: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTemplatesQuery {
    #[serde(default)]
    pub(crate) active: Option<bool>,
}

/// Router builder exposing the template management endpoints.
pub fn template_router<S>(service: Arc<ChecklistService<S>>) -> Router
where
    S: TemplateStore + AppointmentStore + 'static,
{
    Router::new()
        .route(
            "/templates",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/templates/:template_id",
            get(get_handler::<S>).patch(update_handler::<S>),
        )
        .route("/templates/:template_id/items", post(add_item_handler::<S>))
        .route(
            "/templates/:template_id/items/:item_id",
            axum::routing::delete(remove_item_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    axum::Json(payload): axum::Json<CreateTemplateRequest>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    let now = Local::now().naive_local();
    match service.create(&payload.name, now) {
        Ok(template) => (StatusCode::CREATED, axum::Json(template)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    _principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    Query(query): Query<ListTemplatesQuery>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    match service.list(query.active) {
        Ok(templates) => (StatusCode::OK, axum::Json(templates)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    _principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    Path(template_id): Path<String>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    match service.get(&TemplateId(template_id)) {
        Ok(template) => (StatusCode::OK, axum::Json(template)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

pub(crate) async fn update_handler<S>(
    principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    Path(template_id): Path<String>,
    axum::Json(payload): axum::Json<TemplateUpdate>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    let now = Local::now().naive_local();
    match service.update(&TemplateId(template_id), payload, now) {
        Ok(template) => (StatusCode::OK, axum::Json(template)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

pub(crate) async fn add_item_handler<S>(
    principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    Path(template_id): Path<String>,
    axum::Json(payload): axum::Json<AddItemRequest>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.add_item(&TemplateId(template_id), &payload.label, payload.ord) {
        Ok(template) => (StatusCode::CREATED, axum::Json(template)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

pub(crate) async fn remove_item_handler<S>(
    principal: Principal,
    State(service): State<Arc<ChecklistService<S>>>,
    Path((template_id, item_id)): Path<(String, String)>,
) -> Response
where
    S: TemplateStore + AppointmentStore + 'static,
{
    if let Err(denied) = principal.require(Role::Admin) {
        return denied.into_response();
    }

    match service.remove_item(&TemplateId(template_id), &ItemId(item_id)) {
        Ok(template) => (StatusCode::OK, axum::Json(template)).into_response(),
        Err(error) => checklist_error_response(error),
    }
}

fn checklist_error_response(error: ChecklistError) -> Response {
    let status = match &error {
        ChecklistError::TemplateNotFound | ChecklistError::ItemNotFound => StatusCode::NOT_FOUND,
        ChecklistError::NameTaken(_) | ChecklistError::OrdTaken(_) => StatusCode::CONFLICT,
        ChecklistError::NameTooShort
        | ChecklistError::LabelTooShort
        | ChecklistError::OrdOutOfRange(_)
        | ChecklistError::ItemsFull
        | ChecklistError::IncompleteActivation
        | ChecklistError::DeactivateBlocked => StatusCode::BAD_REQUEST,
        ChecklistError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ChecklistError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ChecklistError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
