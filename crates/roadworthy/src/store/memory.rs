use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};

use crate::identity::UserId;
use crate::workflows::checklist::domain::{ChecklistTemplate, TemplateId};
use crate::workflows::checklist::repository::TemplateStore;
use crate::workflows::inspection::domain::{Inspection, InspectionId};
use crate::workflows::inspection::repository::InspectionStore;
use crate::workflows::scheduling::domain::{Appointment, AppointmentId, AppointmentState};
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::domain::User;
use crate::workflows::users::repository::UserStore;
use crate::workflows::vehicles::domain::{Vehicle, VehicleId};
use crate::workflows::vehicles::repository::VehicleStore;

use super::StoreError;

#[derive(Default)]
struct RegistryState {
    users: HashMap<UserId, User>,
    vehicles: HashMap<VehicleId, Vehicle>,
    templates: HashMap<TemplateId, ChecklistTemplate>,
    appointments: HashMap<AppointmentId, Appointment>,
    inspections: HashMap<InspectionId, Inspection>,
}

/// Mutex-guarded in-memory registry. Clones share the underlying state, so
/// a single registry backs every workflow service of a process, and each
/// trait method is one atomic read-or-write unit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<RegistryState>>,
}

impl MemoryStore {
    fn state(&self) -> Result<MutexGuard<'_, RegistryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("registry mutex poisoned".to_string()))
    }
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut state = self.state()?;
        let taken = state.users.contains_key(&user.id)
            || state
                .users
                .values()
                .any(|existing| existing.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(StoreError::Conflict);
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state()?.users.get(id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        let mut rows: Vec<User> = self.state()?.users.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }
}

impl VehicleStore for MemoryStore {
    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, StoreError> {
        let mut state = self.state()?;
        let taken = state.vehicles.contains_key(&vehicle.id)
            || state
                .vehicles
                .values()
                .any(|existing| existing.plate == vehicle.plate);
        if taken {
            return Err(StoreError::Conflict);
        }
        state.vehicles.insert(vehicle.id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.state()?.vehicles.get(id).cloned())
    }

    fn vehicles_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, StoreError> {
        let mut rows: Vec<Vehicle> = self
            .state()?
            .vehicles
            .values()
            .filter(|vehicle| vehicle.owner_id == *owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        let mut rows: Vec<Vehicle> = self.state()?.vehicles.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn remove_vehicle(&self, id: &VehicleId) -> Result<(), StoreError> {
        match self.state()?.vehicles.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

impl TemplateStore for MemoryStore {
    fn insert_template(
        &self,
        template: ChecklistTemplate,
    ) -> Result<ChecklistTemplate, StoreError> {
        let mut state = self.state()?;
        let taken = state.templates.contains_key(&template.id)
            || state
                .templates
                .values()
                .any(|existing| existing.name == template.name);
        if taken {
            return Err(StoreError::Conflict);
        }
        state
            .templates
            .insert(template.id.clone(), template.clone());
        Ok(template)
    }

    fn put_template(&self, template: ChecklistTemplate) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if !state.templates.contains_key(&template.id) {
            return Err(StoreError::NotFound);
        }
        let taken = state
            .templates
            .values()
            .any(|existing| existing.id != template.id && existing.name == template.name);
        if taken {
            return Err(StoreError::Conflict);
        }
        state.templates.insert(template.id.clone(), template);
        Ok(())
    }

    fn template(&self, id: &TemplateId) -> Result<Option<ChecklistTemplate>, StoreError> {
        Ok(self.state()?.templates.get(id).cloned())
    }

    fn templates(&self, active: Option<bool>) -> Result<Vec<ChecklistTemplate>, StoreError> {
        let mut rows: Vec<ChecklistTemplate> = self
            .state()?
            .templates
            .values()
            .filter(|template| active.map_or(true, |flag| template.active == flag))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn latest_active_template(&self) -> Result<Option<ChecklistTemplate>, StoreError> {
        Ok(self
            .state()?
            .templates
            .values()
            .filter(|template| template.active)
            .max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.0.cmp(&b.id.0))
            })
            .cloned())
    }
}

impl AppointmentStore for MemoryStore {
    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut state = self.state()?;
        if state.appointments.contains_key(&appointment.id) {
            return Err(StoreError::Conflict);
        }
        state
            .appointments
            .insert(appointment.id.clone(), appointment.clone());
        Ok(appointment)
    }

    fn put_appointment(&self, appointment: Appointment) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if !state.appointments.contains_key(&appointment.id) {
            return Err(StoreError::NotFound);
        }
        state.appointments.insert(appointment.id.clone(), appointment);
        Ok(())
    }

    fn appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.state()?.appointments.get(id).cloned())
    }

    fn appointments_for_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut rows: Vec<Appointment> = self
            .state()?
            .appointments
            .values()
            .filter(|appointment| appointment.requester_id == *requester)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.scheduled_at
                .cmp(&a.scheduled_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn appointments_for_vehicle(
        &self,
        vehicle: &VehicleId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut rows: Vec<Appointment> = self
            .state()?
            .appointments
            .values()
            .filter(|appointment| appointment.vehicle_id == *vehicle)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.scheduled_at
                .cmp(&a.scheduled_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let mut rows: Vec<Appointment> = self.state()?.appointments.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.scheduled_at
                .cmp(&a.scheduled_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn booked_slots(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDateTime>, StoreError> {
        let mut slots: Vec<NaiveDateTime> = self
            .state()?
            .appointments
            .values()
            .filter(|appointment| appointment.is_active())
            .map(|appointment| appointment.scheduled_at)
            .filter(|scheduled| {
                let date = scheduled.date();
                date >= from && date <= to
            })
            .collect();
        slots.sort();
        Ok(slots)
    }

    fn confirmed_without_inspection(&self) -> Result<Vec<Appointment>, StoreError> {
        let state = self.state()?;
        let mut rows: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|appointment| appointment.state == AppointmentState::Confirmed)
            .filter(|appointment| {
                !state
                    .inspections
                    .values()
                    .any(|inspection| inspection.appointment_id == appointment.id)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(rows)
    }

    fn future_appointments_for_template(
        &self,
        template: &TemplateId,
        cutoff: NaiveDateTime,
    ) -> Result<usize, StoreError> {
        Ok(self
            .state()?
            .appointments
            .values()
            .filter(|appointment| appointment.is_active())
            .filter(|appointment| appointment.template_id == *template)
            .filter(|appointment| appointment.scheduled_at >= cutoff)
            .count())
    }
}

impl InspectionStore for MemoryStore {
    fn insert_inspection(&self, inspection: Inspection) -> Result<Inspection, StoreError> {
        let mut state = self.state()?;
        let taken = state.inspections.contains_key(&inspection.id)
            || state
                .inspections
                .values()
                .any(|existing| existing.appointment_id == inspection.appointment_id);
        if taken {
            return Err(StoreError::Conflict);
        }
        let appointment = state
            .appointments
            .get_mut(&inspection.appointment_id)
            .ok_or(StoreError::NotFound)?;
        appointment.inspector_id = Some(inspection.inspector_id.clone());
        state
            .inspections
            .insert(inspection.id.clone(), inspection.clone());
        Ok(inspection)
    }

    fn put_inspection(&self, inspection: Inspection) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if !state.inspections.contains_key(&inspection.id) {
            return Err(StoreError::NotFound);
        }
        state.inspections.insert(inspection.id.clone(), inspection);
        Ok(())
    }

    fn inspection(&self, id: &InspectionId) -> Result<Option<Inspection>, StoreError> {
        Ok(self.state()?.inspections.get(id).cloned())
    }

    fn inspection_for_appointment(
        &self,
        appointment: &AppointmentId,
    ) -> Result<Option<Inspection>, StoreError> {
        Ok(self
            .state()?
            .inspections
            .values()
            .find(|inspection| inspection.appointment_id == *appointment)
            .cloned())
    }

    fn inspections_for_inspector(
        &self,
        inspector: &UserId,
    ) -> Result<Vec<Inspection>, StoreError> {
        let mut rows: Vec<Inspection> = self
            .state()?
            .inspections
            .values()
            .filter(|inspection| inspection.inspector_id == *inspector)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }

    fn inspections(&self) -> Result<Vec<Inspection>, StoreError> {
        let mut rows: Vec<Inspection> = self.state()?.inspections.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(rows)
    }
}
