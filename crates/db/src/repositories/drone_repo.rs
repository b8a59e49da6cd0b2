//! Repository for the `drones` table and its `drone_medications` links.

use sqlx::{PgPool, Postgres, Transaction};
use dronefleet_core::drone::{DroneState, STATE_IDLE};
use dronefleet_core::registration::NewDrone;
use dronefleet_core::types::DbId;

use crate::models::drone::{Drone, DroneRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, serial_number, model, weight_limit, battery_capacity, state, \
     current_medication_weight, created_at, updated_at";

pub struct DroneRepo;

impl DroneRepo {
    /// Insert a new drone in the `IDLE` state, returning the created row.
    ///
    /// A duplicate `serial_number` surfaces as a `uq_drones_serial_number`
    /// violation.
    pub async fn create(pool: &PgPool, input: &NewDrone) -> Result<Drone, sqlx::Error> {
        let query = format!(
            "INSERT INTO drones (serial_number, model, weight_limit, battery_capacity)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(&input.serial_number)
            .bind(input.model.as_str())
            .bind(input.weight_limit)
            .bind(input.battery_capacity)
            .fetch_one(pool)
            .await?
            .try_into()
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Drone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drones WHERE id = $1");
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(Drone::try_from)
            .transpose()
    }

    /// Fetch a drone and hold its row lock until the transaction ends.
    ///
    /// Waits at most the transaction's `lock_timeout`.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Drone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drones WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .map(Drone::try_from)
            .transpose()
    }

    /// List all drones ordered by id.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Drone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drones ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Drone::try_from)
            .collect()
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM drones")
            .fetch_one(pool)
            .await
    }

    /// List drones that can take a load: `IDLE`, battery at or above
    /// `min_battery`, and within their own weight limit.
    pub async fn list_available(
        pool: &PgPool,
        min_battery: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Drone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drones
             WHERE state = $1 AND battery_capacity >= $2
               AND current_medication_weight <= weight_limit
             ORDER BY id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(STATE_IDLE)
            .bind(min_battery)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Drone::try_from)
            .collect()
    }

    pub async fn count_available(pool: &PgPool, min_battery: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM drones
             WHERE state = $1 AND battery_capacity >= $2
               AND current_medication_weight <= weight_limit",
        )
        .bind(STATE_IDLE)
        .bind(min_battery)
        .fetch_one(pool)
        .await
    }

    /// Ids of the medications currently attached to a drone.
    pub async fn attached_medication_ids(
        tx: &mut Transaction<'_, Postgres>,
        drone_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT medication_id FROM drone_medications WHERE drone_id = $1",
        )
        .bind(drone_id)
        .fetch_all(&mut **tx)
        .await
    }

    /// Attach medications and apply the weight/state change in the caller's
    /// transaction. Returns the updated drone.
    pub async fn apply_load(
        tx: &mut Transaction<'_, Postgres>,
        drone_id: DbId,
        medication_ids: &[DbId],
        added_weight: f64,
        new_state: DroneState,
    ) -> Result<Drone, sqlx::Error> {
        sqlx::query(
            "INSERT INTO drone_medications (drone_id, medication_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(drone_id)
        .bind(medication_ids)
        .execute(&mut **tx)
        .await?;

        let query = format!(
            "UPDATE drones SET
                current_medication_weight = current_medication_weight + $2,
                state = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DroneRow>(&query)
            .bind(drone_id)
            .bind(added_weight)
            .bind(new_state.as_str())
            .fetch_one(&mut **tx)
            .await?
            .try_into()
    }
}
