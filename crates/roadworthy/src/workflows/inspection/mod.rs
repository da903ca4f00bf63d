//! Checklist-based inspections.
//!
//! An inspection binds a confirmed appointment to the eight items of its
//! snapshotted template. Scores are upserted per item and the running total
//! is recomputed on every mutation. Finalization runs the verdict rules in
//! [`evaluation`] once all eight scores are in.

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AppointmentBrief, Inspection, InspectionId, InspectionOverview, InspectionSummary, ItemScore,
    ScoreId, Verdict,
};
pub use evaluation::evaluate;
pub use repository::InspectionStore;
pub use router::inspection_router;
pub use service::{InspectionError, InspectionService};
