use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::checklist::domain::{ChecklistTemplate, TemplateId};
use crate::workflows::inspection::domain::InspectionSummary;
use crate::workflows::users::domain::UserSummary;
use crate::workflows::vehicles::domain::{VehicleId, VehicleSummary, VehicleWithOwner};

/// Identifier wrapper for appointments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

/// Lifecycle state of an appointment.
///
/// `Pending` and `Confirmed` hold a slot; `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentState {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentState {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentState::Pending => "PENDING",
            AppointmentState::Confirmed => "CONFIRMED",
            AppointmentState::Cancelled => "CANCELLED",
        }
    }
}

/// A booked inspection slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub vehicle_id: VehicleId,
    pub requester_id: UserId,
    /// Set when an inspector starts the inspection, never at booking time.
    pub inspector_id: Option<UserId>,
    /// Template snapshotted at booking time; the template may change or be
    /// deactivated afterwards without touching this reference.
    pub template_id: TemplateId,
    pub scheduled_at: NaiveDateTime,
    pub state: AppointmentState,
    pub cancel_reason: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    /// Whether the appointment still occupies its slot and pins the vehicle
    /// and template it references.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            AppointmentState::Pending | AppointmentState::Confirmed
        )
    }
}

/// Owner-facing listing row: the appointment plus its vehicle.
#[derive(Debug, Serialize)]
pub struct AppointmentWithVehicle {
    pub id: AppointmentId,
    pub scheduled_at: NaiveDateTime,
    pub state: AppointmentState,
    pub cancel_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub vehicle: Option<VehicleSummary>,
}

/// Administrative listing row with every related record resolved.
#[derive(Debug, Serialize)]
pub struct AppointmentOverview {
    pub id: AppointmentId,
    pub scheduled_at: NaiveDateTime,
    pub state: AppointmentState,
    pub cancel_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub vehicle: Option<VehicleWithOwner>,
    pub requester: Option<UserSummary>,
    pub inspector: Option<UserSummary>,
    pub inspection: Option<InspectionSummary>,
}

/// A confirmed appointment waiting for an inspector, with the checklist it
/// will be scored against.
#[derive(Debug, Serialize)]
pub struct InspectionCandidate {
    pub id: AppointmentId,
    pub scheduled_at: NaiveDateTime,
    pub state: AppointmentState,
    pub vehicle: Option<VehicleSummary>,
    pub requester: Option<UserSummary>,
    pub template: Option<ChecklistTemplate>,
}

/// Parses the wire date-time format, seconds optional.
pub fn parse_scheduled_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}
