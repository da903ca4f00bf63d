//! Appointment scheduling.
//!
//! Owners book hourly weekday slots for their vehicles. Every appointment
//! snapshots the most recently created active checklist template at booking
//! time, then moves through PENDING, CONFIRMED, and CANCELLED. The slot
//! lattice in [`slots`] drives the advertised availability.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod slots;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_scheduled_at, Appointment, AppointmentId, AppointmentOverview, AppointmentState,
    AppointmentWithVehicle, InspectionCandidate,
};
pub use repository::AppointmentStore;
pub use router::appointment_router;
pub use service::{SchedulingError, SchedulingService};
pub use slots::SlotAvailability;
