//! Storage seams for the workflow services.
//!
//! Each workflow declares the narrow trait it needs next to its service
//! (`workflows::*::repository`); this module ties them together into the
//! combined [`Store`] used where a service spans several record families,
//! and provides the in-memory implementation backing the api service and
//! the test suites.

mod memory;

pub use memory::MemoryStore;

use crate::workflows::checklist::repository::TemplateStore;
use crate::workflows::inspection::repository::InspectionStore;
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::repository::UserStore;
use crate::workflows::vehicles::repository::VehicleStore;

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Combined storage trait for services that span several record families.
pub trait Store:
    UserStore + VehicleStore + TemplateStore + AppointmentStore + InspectionStore
{
}

impl<T> Store for T where
    T: UserStore + VehicleStore + TemplateStore + AppointmentStore + InspectionStore
{
}
