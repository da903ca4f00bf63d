use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::identity::{UserId, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLES_HEADER};
use crate::store::MemoryStore;
use crate::workflows::checklist::domain::TemplateId;
use crate::workflows::scheduling::domain::{Appointment, AppointmentId, AppointmentState};
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::domain::User;
use crate::workflows::users::repository::UserStore;
use crate::workflows::vehicles::domain::Vehicle;
use crate::workflows::vehicles::{vehicle_router, VehicleService};

pub(super) fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date")
        .and_hms_opt(8, 0, 0)
        .expect("valid time")
}

pub(super) fn owner_id() -> UserId {
    UserId("usr-000001".to_string())
}

pub(super) fn build_service() -> (Arc<VehicleService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(VehicleService::new(store.clone()));
    (service, store)
}

pub(super) fn seed_user(store: &MemoryStore, id: &UserId, name: &str, email: &str) {
    store
        .insert_user(User {
            id: id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            roles: Vec::new(),
            created_at: anchor(),
        })
        .expect("user seeds");
}

pub(super) fn seed_appointment(
    store: &MemoryStore,
    vehicle: &Vehicle,
    state: AppointmentState,
    scheduled_at: NaiveDateTime,
) -> Appointment {
    let appointment = Appointment {
        id: AppointmentId(format!("apt-{}", scheduled_at.format("%Y%m%d%H%M"))),
        vehicle_id: vehicle.id.clone(),
        requester_id: vehicle.owner_id.clone(),
        inspector_id: None,
        template_id: TemplateId("tpl-000001".to_string()),
        scheduled_at,
        state,
        cancel_reason: None,
        created_at: anchor(),
    };
    store
        .insert_appointment(appointment.clone())
        .expect("appointment seeds")
}

pub(super) fn router_with_service(service: Arc<VehicleService<MemoryStore>>) -> axum::Router {
    vehicle_router(service)
}

pub(super) fn authed_request(
    method: Method,
    uri: &str,
    user: &UserId,
    roles: &str,
    body: Option<Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, user.0.as_str())
        .header(USER_EMAIL_HEADER, format!("{}@mail.com", user.0))
        .header(USER_ROLES_HEADER, roles);

    match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).expect("payload")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
