use chrono::{NaiveDate, NaiveDateTime};

use crate::identity::UserId;
use crate::store::StoreError;
use crate::workflows::checklist::domain::TemplateId;
use crate::workflows::vehicles::domain::VehicleId;

use super::domain::{Appointment, AppointmentId};

/// Storage abstraction for appointments.
pub trait AppointmentStore: Send + Sync {
    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    /// Replaces a stored appointment wholesale.
    fn put_appointment(&self, appointment: Appointment) -> Result<(), StoreError>;

    fn appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>, StoreError>;

    /// A requester's appointments, most recent scheduled time first.
    fn appointments_for_requester(&self, requester: &UserId)
        -> Result<Vec<Appointment>, StoreError>;

    fn appointments_for_vehicle(&self, vehicle: &VehicleId)
        -> Result<Vec<Appointment>, StoreError>;

    /// Every appointment, most recent scheduled time first.
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Scheduled times of non-cancelled appointments between the two dates,
    /// both inclusive.
    fn booked_slots(&self, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<NaiveDateTime>, StoreError>;

    /// Confirmed appointments without an inspection, earliest first.
    fn confirmed_without_inspection(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Count of non-cancelled appointments scheduled at or after `cutoff`
    /// that snapshot the given template.
    fn future_appointments_for_template(
        &self,
        template: &TemplateId,
        cutoff: NaiveDateTime,
    ) -> Result<usize, StoreError>;
}
