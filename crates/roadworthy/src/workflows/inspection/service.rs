use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::identity::UserId;
use crate::store::{Store, StoreError};
use crate::workflows::checklist::domain::{ItemId, REQUIRED_ITEM_COUNT};
use crate::workflows::scheduling::domain::{AppointmentId, AppointmentState};

use super::domain::{
    AppointmentBrief, Inspection, InspectionId, InspectionOverview, ItemScore, ScoreId, Verdict,
};
use super::evaluation::evaluate;

static INSPECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SCORE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_inspection_id() -> InspectionId {
    let id = INSPECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InspectionId(format!("insp-{id:06}"))
}

fn next_score_id() -> ScoreId {
    let id = SCORE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ScoreId(format!("scr-{id:06}"))
}

/// Runs inspections from start through scoring to the final verdict.
pub struct InspectionService<S> {
    store: Arc<S>,
}

impl<S> InspectionService<S>
where
    S: Store + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Starts an inspection for a confirmed, not-yet-inspected appointment.
    ///
    /// The verdict starts out as the sentinel `SAFE` and the total at zero;
    /// neither means anything until [`InspectionService::finalize`] runs.
    /// Storing the inspection also stamps the inspector onto the
    /// appointment.
    pub fn create(
        &self,
        inspector: &UserId,
        appointment_id: &AppointmentId,
        now: NaiveDateTime,
    ) -> Result<Inspection, InspectionError> {
        let appointment = self
            .store
            .appointment(appointment_id)?
            .ok_or(InspectionError::AppointmentNotFound)?;
        if appointment.state != AppointmentState::Confirmed {
            return Err(InspectionError::AppointmentNotConfirmed);
        }
        if self
            .store
            .inspection_for_appointment(appointment_id)?
            .is_some()
        {
            return Err(InspectionError::DuplicateInspection);
        }

        let complete = self
            .store
            .template(&appointment.template_id)?
            .map(|template| template.is_complete())
            .unwrap_or(false);
        if !complete {
            return Err(InspectionError::TemplateIncomplete);
        }

        let inspection = self.store.insert_inspection(Inspection {
            id: next_inspection_id(),
            appointment_id: appointment_id.clone(),
            inspector_id: inspector.clone(),
            total: 0,
            result: Verdict::Safe,
            general_note: None,
            scores: Vec::new(),
            created_at: now,
        })?;
        tracing::info!(
            inspection = %inspection.id.0,
            appointment = %appointment_id.0,
            "inspection started"
        );
        Ok(inspection)
    }

    /// Upserts the score for one checklist item and recomputes the total.
    ///
    /// Scoring the same item again replaces its value and note in place.
    pub fn add_score(
        &self,
        inspector: &UserId,
        inspection_id: &InspectionId,
        item_id: &ItemId,
        value: u8,
        note: Option<String>,
    ) -> Result<Inspection, InspectionError> {
        if !(1..=10).contains(&value) {
            return Err(InspectionError::InvalidScoreValue(value));
        }

        let mut inspection = self
            .store
            .inspection(inspection_id)?
            .ok_or(InspectionError::InspectionNotFound)?;
        if inspection.inspector_id != *inspector {
            return Err(InspectionError::NotAssignedInspector);
        }

        let appointment = self
            .store
            .appointment(&inspection.appointment_id)?
            .ok_or(InspectionError::AppointmentNotFound)?;
        let item = self
            .store
            .template(&appointment.template_id)?
            .as_ref()
            .and_then(|template| template.item(item_id).cloned())
            .ok_or(InspectionError::ItemNotInTemplate)?;

        match inspection
            .scores
            .iter_mut()
            .find(|score| score.item_id == *item_id)
        {
            Some(existing) => {
                existing.value = value;
                existing.note = note;
            }
            None => inspection.scores.push(ItemScore {
                id: next_score_id(),
                item_id: item_id.clone(),
                label: item.label,
                ord: item.ord,
                value,
                note,
            }),
        }
        inspection.sort_scores();
        inspection.total = inspection.compute_total();

        self.store.put_inspection(inspection.clone())?;
        Ok(inspection)
    }

    /// Runs the verdict rules over the recomputed total and stores the
    /// result with the general note. Requires all eight scores.
    pub fn finalize(
        &self,
        inspector: &UserId,
        inspection_id: &InspectionId,
        general_note: Option<String>,
    ) -> Result<Inspection, InspectionError> {
        let mut inspection = self
            .store
            .inspection(inspection_id)?
            .ok_or(InspectionError::InspectionNotFound)?;
        if inspection.inspector_id != *inspector {
            return Err(InspectionError::NotAssignedInspector);
        }
        if inspection.scores.len() != REQUIRED_ITEM_COUNT {
            return Err(InspectionError::ScoresIncomplete(inspection.scores.len()));
        }

        inspection.total = inspection.compute_total();
        inspection.result = evaluate(inspection.total, &inspection.score_values());
        inspection.general_note = general_note;

        self.store.put_inspection(inspection.clone())?;
        tracing::info!(
            inspection = %inspection.id.0,
            total = inspection.total,
            result = inspection.result.label(),
            "inspection finalized"
        );
        Ok(inspection)
    }

    pub fn get(&self, id: &InspectionId) -> Result<InspectionOverview, InspectionError> {
        let inspection = self
            .store
            .inspection(id)?
            .ok_or(InspectionError::InspectionNotFound)?;
        self.overview(inspection)
    }

    /// The inspection bound to an appointment, if any. The appointment
    /// itself must exist.
    pub fn by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Inspection>, InspectionError> {
        if self.store.appointment(appointment_id)?.is_none() {
            return Err(InspectionError::AppointmentNotFound);
        }
        Ok(self.store.inspection_for_appointment(appointment_id)?)
    }

    pub fn list_mine(
        &self,
        inspector: &UserId,
    ) -> Result<Vec<InspectionOverview>, InspectionError> {
        let mut rows = Vec::new();
        for inspection in self.store.inspections_for_inspector(inspector)? {
            rows.push(self.overview(inspection)?);
        }
        Ok(rows)
    }

    /// Administrative listing, newest first.
    pub fn list_all(&self) -> Result<Vec<InspectionOverview>, InspectionError> {
        let mut rows = Vec::new();
        for inspection in self.store.inspections()? {
            rows.push(self.overview(inspection)?);
        }
        Ok(rows)
    }

    fn overview(&self, inspection: Inspection) -> Result<InspectionOverview, InspectionError> {
        let appointment = match self.store.appointment(&inspection.appointment_id)? {
            Some(appointment) => {
                let vehicle = self
                    .store
                    .vehicle(&appointment.vehicle_id)?
                    .map(|vehicle| vehicle.summary());
                let requester = self
                    .store
                    .user(&appointment.requester_id)?
                    .map(|user| user.summary());
                Some(AppointmentBrief {
                    id: appointment.id,
                    scheduled_at: appointment.scheduled_at,
                    state: appointment.state,
                    vehicle,
                    requester,
                })
            }
            None => None,
        };
        let inspector = self
            .store
            .user(&inspection.inspector_id)?
            .map(|user| user.summary());

        Ok(InspectionOverview {
            id: inspection.id,
            total: inspection.total,
            result: inspection.result,
            general_note: inspection.general_note,
            created_at: inspection.created_at,
            appointment,
            inspector,
            scores: inspection.scores,
        })
    }
}

/// Failures surfaced by the inspection workflow.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("appointment not found")]
    AppointmentNotFound,
    #[error("only confirmed appointments can be inspected")]
    AppointmentNotConfirmed,
    #[error("appointment already has an inspection")]
    DuplicateInspection,
    #[error("checklist template must have exactly 8 items")]
    TemplateIncomplete,
    #[error("inspection not found")]
    InspectionNotFound,
    #[error("only the assigned inspector can work on this inspection")]
    NotAssignedInspector,
    #[error("item does not belong to the inspection checklist")]
    ItemNotInTemplate,
    #[error("score value {0} is outside the 1-10 range")]
    InvalidScoreValue(u8),
    #[error("inspection needs 8 scores, currently has {0}")]
    ScoresIncomplete(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}
