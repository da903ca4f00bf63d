use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Item count a template needs before it may serve appointments.
pub const REQUIRED_ITEM_COUNT: usize = 8;

/// Identifier wrapper for checklist templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

/// Identifier wrapper for single checklist items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

/// One inspection point, positioned within its template by `ord` (1-8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ItemId,
    pub label: String,
    pub ord: u8,
}

/// A named checklist of up to eight inspection points.
///
/// `items` stays sorted by `ord`. Invariant: `active` implies the checklist
/// holds exactly [`REQUIRED_ITEM_COUNT`] items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: TemplateId,
    pub name: String,
    pub active: bool,
    pub items: Vec<ChecklistItem>,
    pub created_at: NaiveDateTime,
}

impl ChecklistTemplate {
    /// Whether all eight positions are filled.
    pub fn is_complete(&self) -> bool {
        self.items.len() == REQUIRED_ITEM_COUNT
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn ord_taken(&self, ord: u8) -> bool {
        self.items.iter().any(|item| item.ord == ord)
    }

    /// Restores ascending `ord` order after an insertion.
    pub fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.ord);
    }
}
