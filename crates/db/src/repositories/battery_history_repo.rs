//! Repository for the append-only `drone_battery_history` table.

use sqlx::PgPool;
use dronefleet_core::types::DbId;

use crate::models::battery_history::BatteryHistoryEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, drone_id, serial_number, battery_level, state, sufficient_battery, recorded_at";

pub struct BatteryHistoryRepo;

impl BatteryHistoryRepo {
    /// Append one snapshot per registered drone in a single statement.
    ///
    /// `healthy_threshold` decides the `sufficient_battery` flag. Returns the
    /// number of rows written.
    pub async fn snapshot_all(pool: &PgPool, healthy_threshold: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO drone_battery_history
                (drone_id, serial_number, battery_level, state, sufficient_battery)
             SELECT id, serial_number, battery_capacity, state, battery_capacity >= $1
             FROM drones",
        )
        .bind(healthy_threshold)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a drone's snapshots, newest first.
    pub async fn list_for_drone(
        pool: &PgPool,
        drone_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BatteryHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drone_battery_history
             WHERE drone_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BatteryHistoryEntry>(&query)
            .bind(drone_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_drone(pool: &PgPool, drone_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM drone_battery_history WHERE drone_id = $1",
        )
        .bind(drone_id)
        .fetch_one(pool)
        .await
    }
}
