use crate::infra::{AppState, WorkflowServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use roadworthy::workflows::checklist::template_router;
use roadworthy::workflows::inspection::inspection_router;
use roadworthy::workflows::scheduling::appointment_router;
use roadworthy::workflows::users::user_router;
use roadworthy::workflows::vehicles::vehicle_router;

/// Every workflow router merged into one app, plus the operational
/// endpoints. Identity comes from the trusted `x-user-*` headers checked
/// inside the workflow handlers; `/health`, `/ready`, and `/metrics` stay
/// open.
pub(crate) fn with_workflow_routes(services: &WorkflowServices) -> axum::Router {
    user_router(services.users.clone())
        .merge(vehicle_router(services.vehicles.clone()))
        .merge(template_router(services.checklist.clone()))
        .merge(appointment_router(services.scheduling.clone()))
        .merge(inspection_router(services.inspections.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
