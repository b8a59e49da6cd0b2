//! Postgres [`FleetStore`] adapter.
//!
//! Each load runs in its own transaction: the drone row is locked with
//! `SELECT ... FOR UPDATE` under a transaction-local `lock_timeout`, the
//! candidates are fetched in one `= ANY($1)` query, and the attachment rows
//! plus the weight/state update commit together or not at all.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use dronefleet_core::battery::HEALTHY_BATTERY_THRESHOLD;
use dronefleet_core::drone::DroneState;
use dronefleet_core::error::CoreError;
use dronefleet_core::loading::{plan_load, LoadPlan};
use dronefleet_core::pagination::{Page, PageRequest};
use dronefleet_core::registration::{NewDrone, NewMedication};
use dronefleet_core::types::DbId;

use super::{
    drone_not_found, FleetStore, LoadOutcome, StoreError, StoreResult, DUPLICATE_DRONE_SERIAL,
    DUPLICATE_MEDICATION_CODE,
};
use crate::models::battery_history::BatteryHistoryEntry;
use crate::models::drone::Drone;
use crate::models::medication::Medication;
use crate::repositories::{BatteryHistoryRepo, DroneRepo, MedicationRepo};

/// PostgreSQL unique constraint violation.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `lock_not_available`, raised when `lock_timeout` expires.
const SQLSTATE_LOCK_NOT_AVAILABLE: &str = "55P03";

#[derive(Clone)]
pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_drone_exists(&self, drone_id: DbId) -> StoreResult<()> {
        match DroneRepo::find_by_id(&self.pool, drone_id).await? {
            Some(_) => Ok(()),
            None => Err(drone_not_found(drone_id)),
        }
    }
}

/// Map a unique violation on `constraint` to a [`CoreError::Conflict`].
fn map_unique_violation(err: sqlx::Error, constraint: &str, message: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION)
            && db_err.constraint() == Some(constraint)
        {
            return CoreError::Conflict(message.to_string()).into();
        }
    }
    err.into()
}

/// Map an expired `lock_timeout` to a retryable [`CoreError::Contention`].
fn map_lock_timeout(err: sqlx::Error, drone_id: DbId) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(SQLSTATE_LOCK_NOT_AVAILABLE) {
            tracing::warn!(drone_id, "Drone row lock wait timed out");
            return CoreError::Contention(format!("Timed out waiting for drone {drone_id}")).into();
        }
    }
    err.into()
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn insert_medication(&self, input: &NewMedication) -> StoreResult<Medication> {
        MedicationRepo::create(&self.pool, input)
            .await
            .map_err(|e| map_unique_violation(e, "uq_medications_code", DUPLICATE_MEDICATION_CODE))
    }

    async fn list_medications(&self, page: PageRequest) -> StoreResult<Page<Medication>> {
        let items = MedicationRepo::list(&self.pool, page.limit(), page.offset()).await?;
        let total = MedicationRepo::count(&self.pool).await?;
        Ok(Page::new(items, page, total))
    }

    async fn insert_drone(&self, input: &NewDrone) -> StoreResult<Drone> {
        DroneRepo::create(&self.pool, input)
            .await
            .map_err(|e| map_unique_violation(e, "uq_drones_serial_number", DUPLICATE_DRONE_SERIAL))
    }

    async fn find_drone(&self, id: DbId) -> StoreResult<Option<Drone>> {
        Ok(DroneRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>> {
        let items = DroneRepo::list(&self.pool, page.limit(), page.offset()).await?;
        let total = DroneRepo::count(&self.pool).await?;
        Ok(Page::new(items, page, total))
    }

    async fn list_available_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>> {
        let items = DroneRepo::list_available(
            &self.pool,
            HEALTHY_BATTERY_THRESHOLD,
            page.limit(),
            page.offset(),
        )
        .await?;
        let total = DroneRepo::count_available(&self.pool, HEALTHY_BATTERY_THRESHOLD).await?;
        Ok(Page::new(items, page, total))
    }

    async fn list_loaded_medications(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<Medication>> {
        self.ensure_drone_exists(drone_id).await?;
        let items =
            MedicationRepo::list_for_drone(&self.pool, drone_id, page.limit(), page.offset())
                .await?;
        let total = MedicationRepo::count_for_drone(&self.pool, drone_id).await?;
        Ok(Page::new(items, page, total))
    }

    async fn load_medications(
        &self,
        drone_id: DbId,
        candidates: &[DbId],
        lock_wait: Duration,
    ) -> StoreResult<LoadOutcome> {
        let mut tx = self.pool.begin().await?;

        // SET does not take bind parameters; the value is a plain integer.
        let set_timeout = format!("SET LOCAL lock_timeout = '{}ms'", lock_wait.as_millis().max(1));
        sqlx::query(&set_timeout).execute(&mut *tx).await?;

        let drone = DroneRepo::find_for_update(&mut tx, drone_id)
            .await
            .map_err(|e| map_lock_timeout(e, drone_id))?
            .ok_or(CoreError::DroneUnavailable { id: drone_id })?;

        let weights: HashMap<DbId, f64> = MedicationRepo::find_by_ids(&mut tx, candidates)
            .await?
            .into_iter()
            .map(|m| (m.id, m.weight))
            .collect();
        let attached: HashSet<DbId> = DroneRepo::attached_medication_ids(&mut tx, drone_id)
            .await?
            .into_iter()
            .collect();

        match plan_load(&drone.load_target(), candidates, &weights, &attached)? {
            LoadPlan::NotModified(reason) => {
                tx.rollback().await?;
                tracing::debug!(drone_id, ?reason, "Load rolled back, nothing attached");
                Ok(LoadOutcome::NotModified { drone, reason })
            }
            LoadPlan::Attach {
                medication_ids,
                added_weight,
            } => {
                let drone = DroneRepo::apply_load(
                    &mut tx,
                    drone_id,
                    &medication_ids,
                    added_weight,
                    DroneState::Loaded,
                )
                .await?;
                let mut by_id: HashMap<DbId, Medication> =
                    MedicationRepo::find_by_ids(&mut tx, &medication_ids)
                        .await?
                        .into_iter()
                        .map(|m| (m.id, m))
                        .collect();
                tx.commit().await?;
                tracing::debug!(
                    drone_id,
                    attached = medication_ids.len(),
                    added_weight,
                    "Load committed"
                );

                let medications = medication_ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .collect();
                Ok(LoadOutcome::Loaded { drone, medications })
            }
        }
    }

    async fn record_battery_snapshots(&self) -> StoreResult<u64> {
        let recorded = BatteryHistoryRepo::snapshot_all(&self.pool, HEALTHY_BATTERY_THRESHOLD).await?;
        tracing::debug!(recorded, "Battery snapshots inserted");
        Ok(recorded)
    }

    async fn list_battery_history(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<BatteryHistoryEntry>> {
        self.ensure_drone_exists(drone_id).await?;
        let items =
            BatteryHistoryRepo::list_for_drone(&self.pool, drone_id, page.limit(), page.offset())
                .await?;
        let total = BatteryHistoryRepo::count_for_drone(&self.pool, drone_id).await?;
        Ok(Page::new(items, page, total))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
