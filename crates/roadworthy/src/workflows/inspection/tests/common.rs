use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::identity::{UserId, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLES_HEADER};
use crate::store::MemoryStore;
use crate::workflows::checklist::domain::ChecklistTemplate;
use crate::workflows::checklist::ChecklistService;
use crate::workflows::inspection::{inspection_router, Inspection, InspectionService};
use crate::workflows::scheduling::domain::{Appointment, AppointmentId, AppointmentState};
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::domain::User;
use crate::workflows::users::repository::UserStore;
use crate::workflows::vehicles::domain::{Vehicle, VehicleId};
use crate::workflows::vehicles::repository::VehicleStore;

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

/// Monday 2026-03-02, 08:00.
pub(super) fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date")
        .and_hms_opt(8, 0, 0)
        .expect("valid time")
}

pub(super) fn build_service() -> (Arc<InspectionService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(InspectionService::new(store.clone()));
    (service, store)
}

pub(super) fn seed_user(store: &MemoryStore, id: &str, name: &str, email: &str) -> UserId {
    let user_id = UserId(id.to_string());
    store
        .insert_user(User {
            id: user_id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            roles: Vec::new(),
            created_at: anchor(),
        })
        .expect("user seeds");
    user_id
}

pub(super) fn seed_vehicle(store: &MemoryStore, owner: &UserId, plate: &str) -> Vehicle {
    store
        .insert_vehicle(Vehicle {
            id: VehicleId(format!("veh-{plate}")),
            plate: plate.to_string(),
            alias: None,
            owner_id: owner.clone(),
            created_at: anchor(),
        })
        .expect("vehicle seeds")
}

/// Creates a template through the checklist service and fills all eight
/// positions, which activates it.
pub(super) fn seed_active_template(store: &Arc<MemoryStore>, name: &str) -> ChecklistTemplate {
    let checklist = ChecklistService::new(store.clone());
    let mut template = checklist.create(name, anchor()).expect("template creates");
    for (index, label) in ITEM_LABELS.iter().enumerate() {
        template = checklist
            .add_item(&template.id, label, (index + 1) as u8)
            .expect("item adds");
    }
    assert!(template.active);
    template
}

pub(super) fn seed_appointment(
    store: &MemoryStore,
    vehicle: &Vehicle,
    template: &ChecklistTemplate,
    state: AppointmentState,
    scheduled_at: NaiveDateTime,
) -> Appointment {
    store
        .insert_appointment(Appointment {
            id: AppointmentId(format!(
                "apt-{}-{}",
                vehicle.plate,
                scheduled_at.format("%Y%m%d%H%M")
            )),
            vehicle_id: vehicle.id.clone(),
            requester_id: vehicle.owner_id.clone(),
            inspector_id: None,
            template_id: template.id.clone(),
            scheduled_at,
            state,
            cancel_reason: None,
            created_at: anchor(),
        })
        .expect("appointment seeds")
}

/// Scores every template item in order with the given values.
pub(super) fn score_all(
    service: &InspectionService<MemoryStore>,
    inspector: &UserId,
    inspection: &Inspection,
    template: &ChecklistTemplate,
    values: [u8; 8],
) -> Inspection {
    let mut current = inspection.clone();
    for (item, value) in template.items.iter().zip(values) {
        current = service
            .add_score(inspector, &inspection.id, &item.id, value, None)
            .expect("score applies");
    }
    current
}

pub(super) fn router_with_service(service: Arc<InspectionService<MemoryStore>>) -> axum::Router {
    inspection_router(service)
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
