use crate::identity::UserId;
use crate::store::StoreError;
use crate::workflows::scheduling::domain::AppointmentId;

use super::domain::{Inspection, InspectionId};

/// Storage abstraction for inspections. An appointment owns at most one
/// inspection.
pub trait InspectionStore: Send + Sync {
    /// Persists a new inspection and stamps its inspector onto the owning
    /// appointment in the same atomic unit. Fails with `NotFound` when the
    /// appointment is missing and `Conflict` when it is already inspected.
    fn insert_inspection(&self, inspection: Inspection) -> Result<Inspection, StoreError>;

    /// Replaces a stored inspection wholesale, scores included.
    fn put_inspection(&self, inspection: Inspection) -> Result<(), StoreError>;

    fn inspection(&self, id: &InspectionId) -> Result<Option<Inspection>, StoreError>;

    fn inspection_for_appointment(
        &self,
        appointment: &AppointmentId,
    ) -> Result<Option<Inspection>, StoreError>;

    /// An inspector's inspections, newest first.
    fn inspections_for_inspector(&self, inspector: &UserId)
        -> Result<Vec<Inspection>, StoreError>;

    /// Every inspection, newest first.
    fn inspections(&self) -> Result<Vec<Inspection>, StoreError>;
}
