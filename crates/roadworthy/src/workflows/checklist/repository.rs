use crate::store::StoreError;

use super::domain::{ChecklistTemplate, TemplateId};

/// Storage abstraction for checklist templates. Template names are unique:
/// `insert_template` and `put_template` reject a taken name with `Conflict`.
pub trait TemplateStore: Send + Sync {
    fn insert_template(&self, template: ChecklistTemplate)
        -> Result<ChecklistTemplate, StoreError>;

    /// Replaces a stored template wholesale, items included.
    fn put_template(&self, template: ChecklistTemplate) -> Result<(), StoreError>;

    fn template(&self, id: &TemplateId) -> Result<Option<ChecklistTemplate>, StoreError>;

    /// All templates newest first, optionally filtered by the active flag.
    fn templates(&self, active: Option<bool>) -> Result<Vec<ChecklistTemplate>, StoreError>;

    /// The most recently created active template, if any.
    fn latest_active_template(&self) -> Result<Option<ChecklistTemplate>, StoreError>;
}
