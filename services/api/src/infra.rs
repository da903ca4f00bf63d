use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;

use roadworthy::error::AppError;
use roadworthy::identity::{Role, UserId};
use roadworthy::store::MemoryStore;
use roadworthy::workflows::checklist::repository::TemplateStore;
use roadworthy::workflows::checklist::{ChecklistService, ChecklistTemplate};
use roadworthy::workflows::inspection::InspectionService;
use roadworthy::workflows::scheduling::domain::Appointment;
use roadworthy::workflows::scheduling::repository::AppointmentStore;
use roadworthy::workflows::scheduling::slots::{free_slots, DEFAULT_WINDOW_DAYS};
use roadworthy::workflows::scheduling::SchedulingService;
use roadworthy::workflows::users::domain::User;
use roadworthy::workflows::users::repository::UserStore;
use roadworthy::workflows::users::UserDirectory;
use roadworthy::workflows::vehicles::domain::Vehicle;
use roadworthy::workflows::vehicles::repository::VehicleStore;
use roadworthy::workflows::vehicles::VehicleService;

pub(crate) const DEMO_TEMPLATE_NAME: &str = "Basic 8-Point";

pub(crate) const DEMO_ITEM_LABELS: [&str; 8] = [
    "Brakes",
    "Lights",
    "Tires",
    "Suspension",
    "Steering",
    "Glass & mirrors",
    "Seatbelts",
    "Emissions",
];

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One service facade per workflow, all sharing the same registry.
pub(crate) struct WorkflowServices {
    pub(crate) users: Arc<UserDirectory<MemoryStore>>,
    pub(crate) vehicles: Arc<VehicleService<MemoryStore>>,
    pub(crate) checklist: Arc<ChecklistService<MemoryStore>>,
    pub(crate) scheduling: Arc<SchedulingService<MemoryStore>>,
    pub(crate) inspections: Arc<InspectionService<MemoryStore>>,
}

impl WorkflowServices {
    pub(crate) fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            users: Arc::new(UserDirectory::new(store.clone())),
            vehicles: Arc::new(VehicleService::new(store.clone())),
            checklist: Arc::new(ChecklistService::new(store.clone())),
            scheduling: Arc::new(SchedulingService::new(store.clone())),
            inspections: Arc::new(InspectionService::new(store)),
        }
    }
}

pub(crate) struct DemoFixtures {
    pub(crate) owner: UserId,
    pub(crate) inspector: UserId,
    pub(crate) admin: UserId,
    pub(crate) vehicle: Vehicle,
    pub(crate) template: ChecklistTemplate,
    pub(crate) appointment: Appointment,
}

/// Seeds the demo data set: a role-bearing user per role, one vehicle, the
/// standard eight-point checklist, and a pending booking at the next
/// bookable slot. Existing records are reused, so seeding twice is harmless.
pub(crate) fn seed_demo_fixtures(
    store: &Arc<MemoryStore>,
    now: NaiveDateTime,
) -> Result<DemoFixtures, AppError> {
    let owner = ensure_user(
        store,
        "usr-demo-owner",
        "Owner Demo",
        "owner@mail.com",
        Role::Owner,
        now,
    )?;
    let inspector = ensure_user(
        store,
        "usr-demo-inspector",
        "Inspector Demo",
        "inspector@mail.com",
        Role::Inspector,
        now,
    )?;
    let admin = ensure_user(
        store,
        "usr-demo-admin",
        "Admin Demo",
        "admin@mail.com",
        Role::Admin,
        now,
    )?;

    let vehicle = ensure_vehicle(store, &owner, "ABC123", now)?;
    let template = ensure_template(store, now)?;
    let appointment = ensure_booking(store, &owner, &vehicle, now)?;

    Ok(DemoFixtures {
        owner,
        inspector,
        admin,
        vehicle,
        template,
        appointment,
    })
}

/// Earliest free slot between now and the end of the default window.
pub(crate) fn next_bookable_slot(
    store: &MemoryStore,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, AppError> {
    let from = now.date();
    let to = from + Duration::days(DEFAULT_WINDOW_DAYS);
    let occupied: HashSet<NaiveDateTime> =
        store.booked_slots(from, to).map_err(bootstrap)?.into_iter().collect();
    free_slots(from, to, &occupied, now)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Bootstrap("no bookable slot in the coming month".to_string()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn bootstrap(err: impl std::fmt::Display) -> AppError {
    AppError::Bootstrap(err.to_string())
}

fn ensure_user(
    store: &MemoryStore,
    id: &str,
    name: &str,
    email: &str,
    role: Role,
    now: NaiveDateTime,
) -> Result<UserId, AppError> {
    if let Some(existing) = store.user_by_email(email).map_err(bootstrap)? {
        return Ok(existing.id);
    }
    let user = store
        .insert_user(User {
            id: UserId(id.to_string()),
            email: email.to_string(),
            name: name.to_string(),
            roles: vec![role],
            created_at: now,
        })
        .map_err(bootstrap)?;
    Ok(user.id)
}

fn ensure_vehicle(
    store: &Arc<MemoryStore>,
    owner: &UserId,
    plate: &str,
    now: NaiveDateTime,
) -> Result<Vehicle, AppError> {
    let existing = store.vehicles_for_owner(owner).map_err(bootstrap)?;
    if let Some(vehicle) = existing.into_iter().find(|vehicle| vehicle.plate == plate) {
        return Ok(vehicle);
    }
    VehicleService::new(store.clone())
        .register(owner, plate, None, now)
        .map_err(bootstrap)
}

fn ensure_template(
    store: &Arc<MemoryStore>,
    now: NaiveDateTime,
) -> Result<ChecklistTemplate, AppError> {
    let existing = store.templates(None).map_err(bootstrap)?;
    if let Some(template) = existing
        .into_iter()
        .find(|template| template.name == DEMO_TEMPLATE_NAME)
    {
        return Ok(template);
    }
    let checklist = ChecklistService::new(store.clone());
    let mut template = checklist.create(DEMO_TEMPLATE_NAME, now).map_err(bootstrap)?;
    for (index, label) in DEMO_ITEM_LABELS.iter().enumerate() {
        template = checklist
            .add_item(&template.id, label, (index + 1) as u8)
            .map_err(bootstrap)?;
    }
    Ok(template)
}

fn ensure_booking(
    store: &Arc<MemoryStore>,
    owner: &UserId,
    vehicle: &Vehicle,
    now: NaiveDateTime,
) -> Result<Appointment, AppError> {
    let existing = store.appointments_for_requester(owner).map_err(bootstrap)?;
    if let Some(appointment) = existing
        .into_iter()
        .find(|appointment| appointment.is_active())
    {
        return Ok(appointment);
    }
    let slot = next_bookable_slot(store, now)?;
    SchedulingService::new(store.clone())
        .create(
            owner,
            &vehicle.id,
            &slot.format("%Y-%m-%dT%H:%M:%S").to_string(),
            now,
        )
        .map_err(bootstrap)
}
