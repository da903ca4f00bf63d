use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::identity::UserId;
use crate::store::StoreError;
use crate::workflows::scheduling::repository::AppointmentStore;
use crate::workflows::users::repository::UserStore;

use super::domain::{normalize_plate, Vehicle, VehicleId, VehicleWithOwner};
use super::repository::VehicleStore;

static VEHICLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_vehicle_id() -> VehicleId {
    let id = VEHICLE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    VehicleId(format!("veh-{id:06}"))
}

/// Owner-scoped registry operations plus the administrative listing.
pub struct VehicleService<S> {
    store: Arc<S>,
}

impl<S> VehicleService<S>
where
    S: VehicleStore + AppointmentStore + UserStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register(
        &self,
        owner: &UserId,
        plate: &str,
        alias: Option<String>,
        now: NaiveDateTime,
    ) -> Result<Vehicle, VehicleError> {
        let plate =
            normalize_plate(plate).ok_or_else(|| VehicleError::InvalidPlate(plate.to_string()))?;

        let vehicle = Vehicle {
            id: next_vehicle_id(),
            plate: plate.clone(),
            alias,
            owner_id: owner.clone(),
            created_at: now,
        };

        self.store.insert_vehicle(vehicle).map_err(|err| match err {
            StoreError::Conflict => VehicleError::PlateTaken(plate),
            other => VehicleError::Store(other),
        })
    }

    pub fn list_mine(&self, owner: &UserId) -> Result<Vec<Vehicle>, VehicleError> {
        Ok(self.store.vehicles_for_owner(owner)?)
    }

    /// Fetch one of the caller's vehicles. A vehicle belonging to someone
    /// else is indistinguishable from a missing one.
    pub fn get_own(&self, owner: &UserId, id: &VehicleId) -> Result<Vehicle, VehicleError> {
        match self.store.vehicle(id)? {
            Some(vehicle) if vehicle.owner_id == *owner => Ok(vehicle),
            _ => Err(VehicleError::VehicleNotFound),
        }
    }

    pub fn remove_own(&self, owner: &UserId, id: &VehicleId) -> Result<Vehicle, VehicleError> {
        let vehicle = self.get_own(owner, id)?;

        let active = self
            .store
            .appointments_for_vehicle(&vehicle.id)?
            .iter()
            .filter(|appointment| appointment.is_active())
            .count();
        if active > 0 {
            return Err(VehicleError::ActiveAppointments { count: active });
        }

        self.store.remove_vehicle(&vehicle.id)?;
        Ok(vehicle)
    }

    pub fn list_all(&self) -> Result<Vec<VehicleWithOwner>, VehicleError> {
        let mut views = Vec::new();
        for vehicle in self.store.vehicles()? {
            let owner = self.store.user(&vehicle.owner_id)?.map(|user| user.summary());
            views.push(VehicleWithOwner {
                id: vehicle.id,
                plate: vehicle.plate,
                alias: vehicle.alias,
                created_at: vehicle.created_at,
                owner,
            });
        }
        Ok(views)
    }
}

/// Error raised by the vehicle registry.
#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    #[error("invalid plate '{0}' (accepted formats: ABC123 or AB123CD)")]
    InvalidPlate(String),
    #[error("a vehicle with plate '{0}' is already registered")]
    PlateTaken(String),
    #[error("vehicle not found")]
    VehicleNotFound,
    #[error("cannot delete: vehicle has {count} active appointment(s)")]
    ActiveAppointments { count: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}
