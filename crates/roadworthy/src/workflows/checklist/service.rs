use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::workflows::scheduling::repository::AppointmentStore;

use super::domain::{ChecklistItem, ChecklistTemplate, ItemId, TemplateId, REQUIRED_ITEM_COUNT};
use super::repository::TemplateStore;

static TEMPLATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ITEM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_template_id() -> TemplateId {
    let id = TEMPLATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TemplateId(format!("tpl-{id:06}"))
}

fn next_item_id() -> ItemId {
    let id = ITEM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ItemId(format!("itm-{id:06}"))
}

/// Partial update applied by [`ChecklistService::update`].
#[derive(Debug, Default, Deserialize)]
pub struct TemplateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Maintains checklist templates and the activation invariant.
pub struct ChecklistService<S> {
    store: Arc<S>,
}

impl<S> ChecklistService<S>
where
    S: TemplateStore + AppointmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        name: &str,
        now: NaiveDateTime,
    ) -> Result<ChecklistTemplate, ChecklistError> {
        let name = name.trim();
        if name.chars().count() < 3 {
            return Err(ChecklistError::NameTooShort);
        }

        let template = ChecklistTemplate {
            id: next_template_id(),
            name: name.to_string(),
            active: false,
            items: Vec::new(),
            created_at: now,
        };

        self.store
            .insert_template(template)
            .map_err(|err| match err {
                StoreError::Conflict => ChecklistError::NameTaken(name.to_string()),
                other => ChecklistError::Store(other),
            })
    }

    /// Adds one item. Filling the eighth position activates the template.
    pub fn add_item(
        &self,
        template_id: &TemplateId,
        label: &str,
        ord: u8,
    ) -> Result<ChecklistTemplate, ChecklistError> {
        let label = label.trim();
        if label.chars().count() < 2 {
            return Err(ChecklistError::LabelTooShort);
        }
        if !(1..=REQUIRED_ITEM_COUNT as u8).contains(&ord) {
            return Err(ChecklistError::OrdOutOfRange(ord));
        }

        let mut template = self
            .store
            .template(template_id)?
            .ok_or(ChecklistError::TemplateNotFound)?;

        if template.items.len() >= REQUIRED_ITEM_COUNT {
            return Err(ChecklistError::ItemsFull);
        }
        if template.ord_taken(ord) {
            return Err(ChecklistError::OrdTaken(ord));
        }

        template.items.push(ChecklistItem {
            id: next_item_id(),
            label: label.to_string(),
            ord,
        });
        template.sort_items();

        let activated = template.is_complete() && !template.active;
        if activated {
            template.active = true;
        }

        self.store.put_template(template.clone())?;
        if activated {
            tracing::info!(template = %template.id.0, "checklist template completed and activated");
        }
        Ok(template)
    }

    pub fn list(&self, active: Option<bool>) -> Result<Vec<ChecklistTemplate>, ChecklistError> {
        Ok(self.store.templates(active)?)
    }

    pub fn get(&self, template_id: &TemplateId) -> Result<ChecklistTemplate, ChecklistError> {
        self.store
            .template(template_id)?
            .ok_or(ChecklistError::TemplateNotFound)
    }

    /// Renames and/or toggles the active flag.
    ///
    /// Activation demands a complete checklist. Deactivation is refused while
    /// any upcoming non-cancelled appointment still references the template.
    pub fn update(
        &self,
        template_id: &TemplateId,
        update: TemplateUpdate,
        now: NaiveDateTime,
    ) -> Result<ChecklistTemplate, ChecklistError> {
        let mut template = self
            .store
            .template(template_id)?
            .ok_or(ChecklistError::TemplateNotFound)?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.chars().count() < 3 {
                return Err(ChecklistError::NameTooShort);
            }
            template.name = name;
        }

        let toggled = matches!(update.active, Some(flag) if flag != template.active);
        if let Some(active) = update.active {
            if active && !template.is_complete() {
                return Err(ChecklistError::IncompleteActivation);
            }
            if !active && template.active {
                let upcoming = self
                    .store
                    .future_appointments_for_template(&template.id, now)?;
                if upcoming > 0 {
                    return Err(ChecklistError::DeactivateBlocked);
                }
            }
            template.active = active;
        }

        self.store
            .put_template(template.clone())
            .map_err(|err| match err {
                StoreError::Conflict => ChecklistError::NameTaken(template.name.clone()),
                other => ChecklistError::Store(other),
            })?;
        if toggled {
            tracing::info!(template = %template.id.0, active = template.active, "checklist template toggled");
        }
        Ok(template)
    }

    /// Removes one item. An active template is deactivated first; the
    /// checklist is no longer complete once the item is gone.
    pub fn remove_item(
        &self,
        template_id: &TemplateId,
        item_id: &ItemId,
    ) -> Result<ChecklistTemplate, ChecklistError> {
        let mut template = self
            .store
            .template(template_id)?
            .ok_or(ChecklistError::TemplateNotFound)?;

        if template.item(item_id).is_none() {
            return Err(ChecklistError::ItemNotFound);
        }

        let deactivated = template.active;
        template.active = false;
        template.items.retain(|item| &item.id != item_id);

        self.store.put_template(template.clone())?;
        if deactivated {
            tracing::info!(template = %template.id.0, "checklist template deactivated on item removal");
        }
        Ok(template)
    }
}

/// Failures surfaced by the checklist workflow.
#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("a template named '{0}' already exists")]
    NameTaken(String),
    #[error("template name must be at least 3 characters")]
    NameTooShort,
    #[error("template not found")]
    TemplateNotFound,
    #[error("checklist item not found")]
    ItemNotFound,
    #[error("item label must be at least 2 characters")]
    LabelTooShort,
    #[error("ord {0} is outside the 1-8 range")]
    OrdOutOfRange(u8),
    #[error("position {0} is already taken in this template")]
    OrdTaken(u8),
    #[error("template already has 8 items")]
    ItemsFull,
    #[error("a template can only be activated with exactly 8 items")]
    IncompleteActivation,
    #[error("cannot deactivate: upcoming appointments still use this template")]
    DeactivateBlocked,
    #[error(transparent)]
    Store(#[from] StoreError),
}
