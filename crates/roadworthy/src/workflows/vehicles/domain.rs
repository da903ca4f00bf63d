use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::users::domain::UserSummary;

/// Identifier wrapper for registered vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

/// A vehicle registered by an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    pub alias: Option<String>,
    pub owner_id: UserId,
    pub created_at: NaiveDateTime,
}

impl Vehicle {
    pub fn summary(&self) -> VehicleSummary {
        VehicleSummary {
            id: self.id.clone(),
            plate: self.plate.clone(),
            alias: self.alias.clone(),
        }
    }
}

/// Slimmed-down vehicle view embedded in appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: VehicleId,
    pub plate: String,
    pub alias: Option<String>,
}

/// Administrative vehicle view carrying the owner summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleWithOwner {
    pub id: VehicleId,
    pub plate: String,
    pub alias: Option<String>,
    pub created_at: NaiveDateTime,
    pub owner: Option<UserSummary>,
}

/// Uppercase and shape-check a plate. Accepted shapes are `ABC123` and
/// `AB123CD`, matching the registry the records come from.
pub fn normalize_plate(raw: &str) -> Option<String> {
    let plate = raw.trim().to_ascii_uppercase();
    let bytes = plate.as_bytes();

    let shape_ok = match bytes.len() {
        6 => {
            bytes[..3].iter().all(|b| b.is_ascii_uppercase())
                && bytes[3..].iter().all(|b| b.is_ascii_digit())
        }
        7 => {
            bytes[..2].iter().all(|b| b.is_ascii_uppercase())
                && bytes[2..5].iter().all(|b| b.is_ascii_digit())
                && bytes[5..].iter().all(|b| b.is_ascii_uppercase())
        }
        _ => false,
    };

    shape_ok.then_some(plate)
}
