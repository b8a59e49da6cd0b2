//! In-process [`FleetStore`] adapter.
//!
//! Tables live behind one `RwLock` that is only held for short reads and
//! commits. Load requests are serialized per drone by a separate map of
//! async mutexes, so loads on different drones proceed in parallel.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use dronefleet_core::drone::DroneState;
use dronefleet_core::error::CoreError;
use dronefleet_core::loading::{plan_load, LoadPlan};
use dronefleet_core::pagination::{Page, PageRequest};
use dronefleet_core::registration::{NewDrone, NewMedication};
use dronefleet_core::types::DbId;

use super::{
    drone_not_found, FleetStore, LoadOutcome, StoreResult, DUPLICATE_DRONE_SERIAL,
    DUPLICATE_MEDICATION_CODE,
};
use crate::models::battery_history::BatteryHistoryEntry;
use crate::models::drone::Drone;
use crate::models::medication::Medication;

#[derive(Default)]
struct Tables {
    last_drone_id: DbId,
    last_medication_id: DbId,
    last_history_id: DbId,
    drones: BTreeMap<DbId, Drone>,
    medications: BTreeMap<DbId, Medication>,
    /// drone id -> attached medication ids
    attachments: HashMap<DbId, BTreeSet<DbId>>,
    history: Vec<BatteryHistoryEntry>,
}

#[derive(Default)]
pub struct MemoryFleetStore {
    tables: RwLock<Tables>,
    drone_locks: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive load lock for a drone, waiting at most `wait`.
    ///
    /// The guard must be held for the whole read-decide-commit sequence.
    /// Unknown drones fail with [`CoreError::DroneUnavailable`] without
    /// allocating a lock, so the lock map never outgrows the drone table.
    pub async fn lock_drone(
        &self,
        drone_id: DbId,
        wait: Duration,
    ) -> Result<OwnedMutexGuard<()>, CoreError> {
        if !self.tables.read().await.drones.contains_key(&drone_id) {
            return Err(CoreError::DroneUnavailable { id: drone_id });
        }
        let lock = {
            let mut locks = self.drone_locks.lock().await;
            Arc::clone(locks.entry(drone_id).or_default())
        };
        tokio::time::timeout(wait, lock.lock_owned())
            .await
            .map_err(|_| {
                tracing::warn!(
                    drone_id,
                    wait_ms = wait.as_millis() as u64,
                    "Load lock wait timed out"
                );
                CoreError::Contention(format!(
                    "Timed out after {}ms waiting for drone {drone_id}",
                    wait.as_millis()
                ))
            })
    }

    /// Number of per-drone load locks allocated so far.
    pub async fn lock_count(&self) -> usize {
        self.drone_locks.lock().await.len()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn insert_medication(&self, input: &NewMedication) -> StoreResult<Medication> {
        let mut tables = self.tables.write().await;
        if tables.medications.values().any(|m| m.code == input.code) {
            return Err(CoreError::Conflict(DUPLICATE_MEDICATION_CODE.to_string()).into());
        }
        tables.last_medication_id += 1;
        let medication = Medication::from_new(tables.last_medication_id, input, Utc::now());
        tables
            .medications
            .insert(medication.id, medication.clone());
        Ok(medication)
    }

    async fn list_medications(&self, page: PageRequest) -> StoreResult<Page<Medication>> {
        let tables = self.tables.read().await;
        let all: Vec<Medication> = tables.medications.values().cloned().collect();
        Ok(page.slice(&all))
    }

    async fn insert_drone(&self, input: &NewDrone) -> StoreResult<Drone> {
        let mut tables = self.tables.write().await;
        if tables
            .drones
            .values()
            .any(|d| d.serial_number == input.serial_number)
        {
            return Err(CoreError::Conflict(DUPLICATE_DRONE_SERIAL.to_string()).into());
        }
        tables.last_drone_id += 1;
        let drone = Drone::from_new(tables.last_drone_id, input, Utc::now());
        tables.drones.insert(drone.id, drone.clone());
        Ok(drone)
    }

    async fn find_drone(&self, id: DbId) -> StoreResult<Option<Drone>> {
        Ok(self.tables.read().await.drones.get(&id).cloned())
    }

    async fn list_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>> {
        let tables = self.tables.read().await;
        let all: Vec<Drone> = tables.drones.values().cloned().collect();
        Ok(page.slice(&all))
    }

    async fn list_available_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>> {
        let tables = self.tables.read().await;
        let available: Vec<Drone> = tables
            .drones
            .values()
            .filter(|d| d.is_available())
            .cloned()
            .collect();
        Ok(page.slice(&available))
    }

    async fn list_loaded_medications(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<Medication>> {
        let tables = self.tables.read().await;
        if !tables.drones.contains_key(&drone_id) {
            return Err(drone_not_found(drone_id));
        }
        let loaded: Vec<Medication> = tables
            .attachments
            .get(&drone_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.medications.get(id).cloned())
            .collect();
        Ok(page.slice(&loaded))
    }

    async fn load_medications(
        &self,
        drone_id: DbId,
        candidates: &[DbId],
        lock_wait: Duration,
    ) -> StoreResult<LoadOutcome> {
        let _guard = self.lock_drone(drone_id, lock_wait).await?;

        let (drone, weights, attached) = {
            let tables = self.tables.read().await;
            let drone = tables
                .drones
                .get(&drone_id)
                .cloned()
                .ok_or(CoreError::DroneUnavailable { id: drone_id })?;
            let weights: HashMap<DbId, f64> = candidates
                .iter()
                .filter_map(|id| tables.medications.get(id).map(|m| (*id, m.weight)))
                .collect();
            let attached: HashSet<DbId> = tables
                .attachments
                .get(&drone_id)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default();
            (drone, weights, attached)
        };

        match plan_load(&drone.load_target(), candidates, &weights, &attached)? {
            LoadPlan::NotModified(reason) => Ok(LoadOutcome::NotModified { drone, reason }),
            LoadPlan::Attach {
                medication_ids,
                added_weight,
            } => {
                let mut guard = self.tables.write().await;
                let tables = &mut *guard;
                let drone = tables
                    .drones
                    .get_mut(&drone_id)
                    .ok_or(CoreError::DroneUnavailable { id: drone_id })?;
                drone.current_medication_weight += added_weight;
                drone.state = DroneState::Loaded;
                drone.updated_at = Utc::now();
                let drone = drone.clone();

                tables
                    .attachments
                    .entry(drone_id)
                    .or_default()
                    .extend(medication_ids.iter().copied());
                let medications = medication_ids
                    .iter()
                    .filter_map(|id| tables.medications.get(id).cloned())
                    .collect();

                Ok(LoadOutcome::Loaded { drone, medications })
            }
        }
    }

    async fn record_battery_snapshots(&self) -> StoreResult<u64> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let now = Utc::now();
        let mut recorded = 0u64;
        for drone in tables.drones.values() {
            tables.last_history_id += 1;
            tables
                .history
                .push(BatteryHistoryEntry::snapshot(tables.last_history_id, drone, now));
            recorded += 1;
        }
        Ok(recorded)
    }

    async fn list_battery_history(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<BatteryHistoryEntry>> {
        let tables = self.tables.read().await;
        if !tables.drones.contains_key(&drone_id) {
            return Err(drone_not_found(drone_id));
        }
        let entries: Vec<BatteryHistoryEntry> = tables
            .history
            .iter()
            .rev()
            .filter(|e| e.drone_id == drone_id)
            .cloned()
            .collect();
        Ok(page.slice(&entries))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
