use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::checklist::domain::ItemId;
use crate::workflows::scheduling::domain::{AppointmentId, AppointmentState};
use crate::workflows::users::domain::UserSummary;
use crate::workflows::vehicles::domain::VehicleSummary;

/// Identifier wrapper for inspections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InspectionId(pub String);

/// Identifier wrapper for single item scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreId(pub String);

/// Outcome of a finalized inspection.
///
/// Until finalization the stored value is the sentinel `Safe` and carries no
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe,
    Recheck,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Recheck => "RECHECK",
        }
    }
}

/// One scored checklist item. Label and position are copied from the
/// checklist item at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub id: ScoreId,
    pub item_id: ItemId,
    pub label: String,
    pub ord: u8,
    pub value: u8,
    pub note: Option<String>,
}

/// A checklist inspection of one appointment.
///
/// `scores` stays sorted by item position and holds at most one entry per
/// checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: InspectionId,
    pub appointment_id: AppointmentId,
    pub inspector_id: UserId,
    pub total: u32,
    pub result: Verdict,
    pub general_note: Option<String>,
    pub scores: Vec<ItemScore>,
    pub created_at: NaiveDateTime,
}

impl Inspection {
    pub fn compute_total(&self) -> u32 {
        self.scores.iter().map(|score| u32::from(score.value)).sum()
    }

    pub fn score_values(&self) -> Vec<u8> {
        self.scores.iter().map(|score| score.value).collect()
    }

    /// Restores ascending item position order after an insertion.
    pub fn sort_scores(&mut self) {
        self.scores.sort_by_key(|score| score.ord);
    }

    pub fn summary(&self) -> InspectionSummary {
        InspectionSummary {
            id: self.id.clone(),
            total: self.total,
            result: self.result,
        }
    }
}

/// Slimmed-down inspection view embedded in appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSummary {
    pub id: InspectionId,
    pub total: u32,
    pub result: Verdict,
}

/// The appointment context shown alongside an inspection.
#[derive(Debug, Serialize)]
pub struct AppointmentBrief {
    pub id: AppointmentId,
    pub scheduled_at: NaiveDateTime,
    pub state: AppointmentState,
    pub vehicle: Option<VehicleSummary>,
    pub requester: Option<UserSummary>,
}

/// Detail view returned by the fetch and listing operations.
#[derive(Debug, Serialize)]
pub struct InspectionOverview {
    pub id: InspectionId,
    pub total: u32,
    pub result: Verdict,
    pub general_note: Option<String>,
    pub created_at: NaiveDateTime,
    pub appointment: Option<AppointmentBrief>,
    pub inspector: Option<UserSummary>,
    pub scores: Vec<ItemScore>,
}
