//! Battery audit log entries.

use serde::Serialize;
use sqlx::FromRow;
use dronefleet_core::types::{DbId, Timestamp};

use crate::models::drone::Drone;

/// A row from the append-only `drone_battery_history` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BatteryHistoryEntry {
    pub id: DbId,
    pub drone_id: DbId,
    pub serial_number: String,
    pub battery_level: i32,
    /// Drone state at sample time, as stored text.
    pub state: String,
    pub sufficient_battery: bool,
    #[serde(rename = "timestamp")]
    pub recorded_at: Timestamp,
}

impl BatteryHistoryEntry {
    /// Snapshot a drone's current battery reading.
    pub fn snapshot(id: DbId, drone: &Drone, recorded_at: Timestamp) -> Self {
        Self {
            id,
            drone_id: drone.id,
            serial_number: drone.serial_number.clone(),
            battery_level: drone.battery_capacity,
            state: drone.state.as_str().to_string(),
            sufficient_battery: drone.has_healthy_battery(),
            recorded_at,
        }
    }
}
