//! Owner-scoped vehicle registry.
//!
//! Vehicles are registered by their owner and identified by a normalized
//! plate. Removal waits until no non-cancelled appointment references them.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{normalize_plate, Vehicle, VehicleId, VehicleSummary, VehicleWithOwner};
pub use repository::VehicleStore;
pub use router::vehicle_router;
pub use service::{VehicleError, VehicleService};
