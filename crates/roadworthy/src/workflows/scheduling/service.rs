use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::identity::UserId;
use crate::store::{Store, StoreError};
use crate::workflows::vehicles::domain::{VehicleId, VehicleWithOwner};

use super::domain::{
    parse_scheduled_at, Appointment, AppointmentId, AppointmentOverview, AppointmentState,
    AppointmentWithVehicle, InspectionCandidate,
};
use super::slots::{free_slots, SlotAvailability, DEFAULT_WINDOW_DAYS};

static APPOINTMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_appointment_id() -> AppointmentId {
    let id = APPOINTMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppointmentId(format!("apt-{id:06}"))
}

/// Manages the appointment lifecycle and advertises the free slots.
pub struct SchedulingService<S> {
    store: Arc<S>,
}

impl<S> SchedulingService<S>
where
    S: Store + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Books a slot for one of the requester's vehicles.
    ///
    /// Ownership is checked before anything else; a vehicle that exists but
    /// belongs to someone else reads the same as a missing one. The booking
    /// snapshots the most recently created active template.
    pub fn create(
        &self,
        requester: &UserId,
        vehicle_id: &VehicleId,
        scheduled_at: &str,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let owned = self
            .store
            .vehicle(vehicle_id)?
            .map(|vehicle| vehicle.owner_id == *requester)
            .unwrap_or(false);
        if !owned {
            return Err(SchedulingError::VehicleNotOwned);
        }

        let when = parse_scheduled_at(scheduled_at)
            .ok_or_else(|| SchedulingError::InvalidDate(scheduled_at.to_string()))?;
        if when < now {
            return Err(SchedulingError::DateInPast);
        }

        let template = self
            .store
            .latest_active_template()?
            .ok_or(SchedulingError::NoActiveTemplate)?;

        let appointment = self.store.insert_appointment(Appointment {
            id: next_appointment_id(),
            vehicle_id: vehicle_id.clone(),
            requester_id: requester.clone(),
            inspector_id: None,
            template_id: template.id,
            scheduled_at: when,
            state: AppointmentState::Pending,
            cancel_reason: None,
            created_at: now,
        })?;
        tracing::info!(
            appointment = %appointment.id.0,
            scheduled_at = %appointment.scheduled_at,
            "appointment booked"
        );
        Ok(appointment)
    }

    pub fn list_mine(
        &self,
        requester: &UserId,
    ) -> Result<Vec<AppointmentWithVehicle>, SchedulingError> {
        let mut rows = Vec::new();
        for appointment in self.store.appointments_for_requester(requester)? {
            let vehicle = self
                .store
                .vehicle(&appointment.vehicle_id)?
                .map(|vehicle| vehicle.summary());
            rows.push(AppointmentWithVehicle {
                id: appointment.id,
                scheduled_at: appointment.scheduled_at,
                state: appointment.state,
                cancel_reason: appointment.cancel_reason,
                created_at: appointment.created_at,
                vehicle,
            });
        }
        Ok(rows)
    }

    pub fn confirm(&self, id: &AppointmentId) -> Result<Appointment, SchedulingError> {
        let mut appointment = self
            .store
            .appointment(id)?
            .ok_or(SchedulingError::AppointmentNotFound)?;
        if appointment.state != AppointmentState::Pending {
            return Err(SchedulingError::NotPending);
        }

        appointment.state = AppointmentState::Confirmed;
        self.store.put_appointment(appointment.clone())?;
        tracing::info!(appointment = %appointment.id.0, "appointment confirmed");
        Ok(appointment)
    }

    /// Cancels one of the requester's appointments. Terminal: a cancelled
    /// appointment never leaves that state.
    pub fn cancel(
        &self,
        requester: &UserId,
        id: &AppointmentId,
        reason: Option<String>,
    ) -> Result<Appointment, SchedulingError> {
        let mut appointment = match self.store.appointment(id)? {
            Some(appointment) if appointment.requester_id == *requester => appointment,
            _ => return Err(SchedulingError::AppointmentNotFound),
        };
        if appointment.state == AppointmentState::Cancelled {
            return Err(SchedulingError::AlreadyCancelled);
        }

        appointment.state = AppointmentState::Cancelled;
        appointment.cancel_reason = reason;
        self.store.put_appointment(appointment.clone())?;
        tracing::info!(appointment = %appointment.id.0, "appointment cancelled");
        Ok(appointment)
    }

    /// Free lattice slots in the requested window. Both bounds default
    /// relative to today: start today, end thirty days out.
    pub fn availability(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        now: NaiveDateTime,
    ) -> Result<SlotAvailability, SchedulingError> {
        let start = from.unwrap_or_else(|| now.date());
        let end = to.unwrap_or_else(|| now.date() + Duration::days(DEFAULT_WINDOW_DAYS));

        let occupied: HashSet<NaiveDateTime> =
            self.store.booked_slots(start, end)?.into_iter().collect();
        let slots = free_slots(start, end, &occupied, now);
        let total = slots.len();
        Ok(SlotAvailability { slots, total })
    }

    /// Confirmed, not-yet-inspected appointments with their checklists,
    /// earliest first.
    pub fn awaiting_inspection(&self) -> Result<Vec<InspectionCandidate>, SchedulingError> {
        let mut candidates = Vec::new();
        for appointment in self.store.confirmed_without_inspection()? {
            let vehicle = self
                .store
                .vehicle(&appointment.vehicle_id)?
                .map(|vehicle| vehicle.summary());
            let requester = self
                .store
                .user(&appointment.requester_id)?
                .map(|user| user.summary());
            let template = self.store.template(&appointment.template_id)?;
            candidates.push(InspectionCandidate {
                id: appointment.id,
                scheduled_at: appointment.scheduled_at,
                state: appointment.state,
                vehicle,
                requester,
                template,
            });
        }
        Ok(candidates)
    }

    /// Administrative listing with related records resolved, most recent
    /// scheduled time first.
    pub fn list_all(&self) -> Result<Vec<AppointmentOverview>, SchedulingError> {
        let mut rows = Vec::new();
        for appointment in self.store.appointments()? {
            let vehicle = match self.store.vehicle(&appointment.vehicle_id)? {
                Some(vehicle) => {
                    let owner = self
                        .store
                        .user(&vehicle.owner_id)?
                        .map(|user| user.summary());
                    Some(VehicleWithOwner {
                        id: vehicle.id,
                        plate: vehicle.plate,
                        alias: vehicle.alias,
                        created_at: vehicle.created_at,
                        owner,
                    })
                }
                None => None,
            };
            let requester = self
                .store
                .user(&appointment.requester_id)?
                .map(|user| user.summary());
            let inspector = match &appointment.inspector_id {
                Some(id) => self.store.user(id)?.map(|user| user.summary()),
                None => None,
            };
            let inspection = self
                .store
                .inspection_for_appointment(&appointment.id)?
                .map(|inspection| inspection.summary());

            rows.push(AppointmentOverview {
                id: appointment.id,
                scheduled_at: appointment.scheduled_at,
                state: appointment.state,
                cancel_reason: appointment.cancel_reason,
                created_at: appointment.created_at,
                vehicle,
                requester,
                inspector,
                inspection,
            });
        }
        Ok(rows)
    }
}

/// Failures surfaced by the scheduling workflow.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("vehicle does not belong to you")]
    VehicleNotOwned,
    #[error("invalid date-time '{0}'")]
    InvalidDate(String),
    #[error("appointment date must be in the future")]
    DateInPast,
    #[error("no active checklist template available")]
    NoActiveTemplate,
    #[error("appointment not found")]
    AppointmentNotFound,
    #[error("only pending appointments can be confirmed")]
    NotPending,
    #[error("appointment is already cancelled")]
    AlreadyCancelled,
    #[error(transparent)]
    Store(#[from] StoreError),
}
