//! Drone entity model.

use serde::Serialize;
use sqlx::FromRow;
use dronefleet_core::battery;
use dronefleet_core::drone::{DroneModel, DroneState};
use dronefleet_core::loading::LoadTarget;
use dronefleet_core::registration::NewDrone;
use dronefleet_core::types::{DbId, Timestamp};

/// A drone as seen by the rest of the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drone {
    pub id: DbId,
    pub serial_number: String,
    pub model: DroneModel,
    /// Grams.
    pub weight_limit: f64,
    /// Percent, 0-100.
    pub battery_capacity: i32,
    pub state: DroneState,
    /// Sum of the weights of the attached medications.
    pub current_medication_weight: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Drone {
    /// A freshly registered drone: `IDLE`, carrying nothing.
    pub fn from_new(id: DbId, input: &NewDrone, now: Timestamp) -> Self {
        Self {
            id,
            serial_number: input.serial_number.clone(),
            model: input.model,
            weight_limit: input.weight_limit,
            battery_capacity: input.battery_capacity,
            state: DroneState::Idle,
            current_medication_weight: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_healthy_battery(&self) -> bool {
        battery::is_healthy(self.battery_capacity)
    }

    /// Idle, healthy battery and within its own weight limit.
    pub fn is_available(&self) -> bool {
        self.state == DroneState::Idle
            && self.has_healthy_battery()
            && self.current_medication_weight <= self.weight_limit
    }

    pub fn load_target(&self) -> LoadTarget {
        LoadTarget {
            drone_id: self.id,
            state: self.state,
            battery_capacity: self.battery_capacity,
            weight_limit: self.weight_limit,
            current_medication_weight: self.current_medication_weight,
        }
    }

    pub fn battery_status(&self) -> BatteryStatus {
        BatteryStatus {
            drone_id: self.id,
            serial_number: self.serial_number.clone(),
            battery_level: self.battery_capacity,
            state: self.state,
            sufficient_battery: self.has_healthy_battery(),
        }
    }
}

/// Current battery reading for one drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryStatus {
    pub drone_id: DbId,
    pub serial_number: String,
    pub battery_level: i32,
    pub state: DroneState,
    pub sufficient_battery: bool,
}

/// Raw `drones` row; `model` and `state` are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct DroneRow {
    pub id: DbId,
    pub serial_number: String,
    pub model: String,
    pub weight_limit: f64,
    pub battery_capacity: i32,
    pub state: String,
    pub current_medication_weight: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DroneRow> for Drone {
    type Error = sqlx::Error;

    fn try_from(row: DroneRow) -> Result<Self, Self::Error> {
        let model = DroneModel::from_str_value(&row.model).map_err(|e| sqlx::Error::Decode(e.into()))?;
        let state = DroneState::from_str_value(&row.state).map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(Self {
            id: row.id,
            serial_number: row.serial_number,
            model,
            weight_limit: row.weight_limit,
            battery_capacity: row.battery_capacity,
            state,
            current_medication_weight: row.current_medication_weight,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drone() -> Drone {
        let input = NewDrone {
            serial_number: "SBGH00123".into(),
            model: DroneModel::Lightweight,
            weight_limit: 500.0,
            battery_capacity: 100,
        };
        Drone::from_new(1, &input, chrono::Utc::now())
    }

    #[test]
    fn new_drone_is_idle_and_empty() {
        let d = drone();
        assert_eq!(d.state, DroneState::Idle);
        assert_eq!(d.current_medication_weight, 0.0);
        assert!(d.is_available());
    }

    #[test]
    fn low_battery_not_available() {
        let d = Drone {
            battery_capacity: 24,
            ..drone()
        };
        assert!(!d.is_available());
        assert!(!d.battery_status().sufficient_battery);
    }

    #[test]
    fn loaded_not_available() {
        let d = Drone {
            state: DroneState::Loaded,
            ..drone()
        };
        assert!(!d.is_available());
    }

    #[test]
    fn row_with_unknown_state_fails_to_convert() {
        let d = drone();
        let row = DroneRow {
            id: d.id,
            serial_number: d.serial_number,
            model: "Lightweight".into(),
            weight_limit: d.weight_limit,
            battery_capacity: d.battery_capacity,
            state: "FLYING".into(),
            current_medication_weight: 0.0,
            created_at: d.created_at,
            updated_at: d.updated_at,
        };
        assert!(Drone::try_from(row).is_err());
    }
}
