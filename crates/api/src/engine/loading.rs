use std::sync::Arc;
use std::time::{Duration, Instant};

use dronefleet_core::error::CoreError;
use dronefleet_core::types::DbId;
use dronefleet_db::store::{FleetStore, LoadOutcome, StoreError, StoreResult};

/// Runs load requests against the store with a bounded lock wait.
#[derive(Clone)]
pub struct LoadingEngine {
    store: Arc<dyn FleetStore>,
    lock_wait: Duration,
}

impl LoadingEngine {
    pub fn new(store: Arc<dyn FleetStore>, lock_wait: Duration) -> Self {
        Self { store, lock_wait }
    }

    /// Load `candidates` onto a drone, in request order.
    ///
    /// The whole read-decide-commit sequence runs under the drone's lock in
    /// the store; this layer never retries.
    pub async fn load(&self, drone_id: DbId, candidates: &[DbId]) -> StoreResult<LoadOutcome> {
        let started = Instant::now();
        let result = self
            .store
            .load_medications(drone_id, candidates, self.lock_wait)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(LoadOutcome::Loaded { drone, medications }) => {
                tracing::info!(
                    drone_id,
                    requested = candidates.len(),
                    accepted = medications.len(),
                    weight = drone.current_medication_weight,
                    elapsed_ms,
                    "Drone loaded",
                );
            }
            Ok(LoadOutcome::NotModified { reason, .. }) => {
                tracing::info!(
                    drone_id,
                    requested = candidates.len(),
                    reason = reason.as_str(),
                    elapsed_ms,
                    "Load not modified",
                );
            }
            Err(StoreError::Core(CoreError::DroneUnavailable { .. })) => {
                tracing::debug!(drone_id, "Load rejected: drone unavailable");
            }
            Err(StoreError::Core(CoreError::Contention(_))) => {
                tracing::warn!(
                    drone_id,
                    lock_wait_ms = self.lock_wait.as_millis() as u64,
                    "Load rejected: lock wait exceeded",
                );
            }
            Err(e) => {
                tracing::error!(drone_id, error = %e, "Load failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use dronefleet_core::drone::DroneModel;
    use dronefleet_core::registration::{NewDrone, NewMedication};
    use dronefleet_db::store::MemoryFleetStore;

    #[tokio::test]
    async fn load_delegates_to_store() {
        let store = Arc::new(MemoryFleetStore::new());
        let drone = store
            .insert_drone(&NewDrone {
                serial_number: "D1".into(),
                model: DroneModel::Lightweight,
                weight_limit: 500.0,
                battery_capacity: 100,
            })
            .await
            .unwrap();
        let med = store
            .insert_medication(&NewMedication {
                name: "aspirin".into(),
                weight: 20.0,
                code: "ASP_1".into(),
                image: None,
            })
            .await
            .unwrap();

        let engine = LoadingEngine::new(store, Duration::from_millis(100));
        let outcome = engine.load(drone.id, &[med.id]).await.unwrap();

        assert!(outcome.is_loaded());
        assert_eq!(outcome.drone().current_medication_weight, 20.0);
    }

    #[tokio::test]
    async fn unknown_drone_surfaces_unavailable() {
        let engine = LoadingEngine::new(Arc::new(MemoryFleetStore::new()), Duration::from_millis(100));
        let err = engine.load(7, &[1]).await.unwrap_err();
        assert_matches!(err, StoreError::Core(CoreError::DroneUnavailable { id: 7 }));
    }
}
