use crate::identity::UserId;
use crate::store::StoreError;

use super::domain::{Vehicle, VehicleId};

/// Storage abstraction for the vehicle registry. `insert_vehicle` rejects a
/// taken plate with `Conflict`; listings come back newest first.
pub trait VehicleStore: Send + Sync {
    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, StoreError>;
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, StoreError>;
    fn vehicles_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, StoreError>;
    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;
    fn remove_vehicle(&self, id: &VehicleId) -> Result<(), StoreError>;
}
