//! Repository for the `medications` table.

use sqlx::{PgPool, Postgres, Transaction};
use dronefleet_core::registration::NewMedication;
use dronefleet_core::types::DbId;

use crate::models::medication::Medication;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, weight, code, image, created_at";

/// Same columns, qualified for joins against `drone_medications`.
const JOINED_COLUMNS: &str = "m.id, m.name, m.weight, m.code, m.image, m.created_at";

pub struct MedicationRepo;

impl MedicationRepo {
    /// Insert a new medication, returning the created row.
    ///
    /// A duplicate `code` surfaces as a `uq_medications_code` violation.
    pub async fn create(pool: &PgPool, input: &NewMedication) -> Result<Medication, sqlx::Error> {
        let query = format!(
            "INSERT INTO medications (name, weight, code, image)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(&input.name)
            .bind(input.weight)
            .bind(&input.code)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Fetch every medication whose id is in `ids`, in one round trip.
    ///
    /// Unknown ids are simply absent from the result.
    pub async fn find_by_ids(
        tx: &mut Transaction<'_, Postgres>,
        ids: &[DbId],
    ) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE id = ANY($1)");
        sqlx::query_as::<_, Medication>(&query)
            .bind(ids)
            .fetch_all(&mut **tx)
            .await
    }

    /// List the catalog ordered by id.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Medication>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medications")
            .fetch_one(pool)
            .await
    }

    /// List the medications attached to a drone, ordered by id.
    pub async fn list_for_drone(
        pool: &PgPool,
        drone_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM medications m
             JOIN drone_medications dm ON dm.medication_id = m.id
             WHERE dm.drone_id = $1
             ORDER BY m.id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(drone_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_drone(pool: &PgPool, drone_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM drone_medications WHERE drone_id = $1")
            .bind(drone_id)
            .fetch_one(pool)
            .await
    }
}
