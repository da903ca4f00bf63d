//! Checklist template management.
//!
//! Templates name the eight inspection points an inspector walks through.
//! A template only advertises itself to the scheduler while active, and the
//! active flag is tied to the item count: the eighth item activates a
//! template, removing any item deactivates it again.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ChecklistItem, ChecklistTemplate, ItemId, TemplateId, REQUIRED_ITEM_COUNT};
pub use repository::TemplateStore;
pub use router::template_router;
pub use service::{ChecklistError, ChecklistService, TemplateUpdate};
