use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::identity::{UserId, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLES_HEADER};
use crate::store::MemoryStore;
use crate::workflows::checklist::domain::ChecklistTemplate;
use crate::workflows::checklist::{template_router, ChecklistService};
use crate::workflows::scheduling::domain::{Appointment, AppointmentId, AppointmentState};
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::vehicles::domain::VehicleId;

pub(super) const ITEM_LABELS: [&str; 8] = [
    "Brakes",
    "Lights",
    "Tires",
    "Suspension",
    "Steering",
    "Glass & mirrors",
    "Seatbelts",
    "Emissions",
];

pub(super) fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date")
        .and_hms_opt(8, 0, 0)
        .expect("valid time")
}

pub(super) fn build_service() -> (Arc<ChecklistService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(ChecklistService::new(store.clone()));
    (service, store)
}

/// Creates a template and fills all eight positions, which activates it.
pub(super) fn complete_template(
    service: &ChecklistService<MemoryStore>,
    name: &str,
) -> ChecklistTemplate {
    let mut template = service.create(name, anchor()).expect("template creates");
    for (index, label) in ITEM_LABELS.iter().enumerate() {
        template = service
            .add_item(&template.id, label, (index + 1) as u8)
            .expect("item adds");
    }
    assert!(template.active, "eighth item should activate the template");
    template
}

pub(super) fn seed_appointment(
    store: &MemoryStore,
    template: &ChecklistTemplate,
    state: AppointmentState,
    scheduled_at: NaiveDateTime,
) -> Appointment {
    let appointment = Appointment {
        id: AppointmentId(format!("apt-{}", scheduled_at.format("%Y%m%d%H%M"))),
        vehicle_id: VehicleId("veh-000001".to_string()),
        requester_id: UserId("usr-000001".to_string()),
        inspector_id: None,
        template_id: template.id.clone(),
        scheduled_at,
        state,
        cancel_reason: None,
        created_at: anchor(),
    };
    store
        .insert_appointment(appointment.clone())
        .expect("appointment seeds")
}

pub(super) fn router_with_service(service: Arc<ChecklistService<MemoryStore>>) -> axum::Router {
    template_router(service)
}

pub(super) fn authed_request(
    method: Method,
    uri: &str,
    user: &str,
    roles: &str,
    body: Option<Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, user)
        .header(USER_EMAIL_HEADER, format!("{user}@mail.com"))
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
