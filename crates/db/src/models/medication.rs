//! Medication entity model.

use serde::Serialize;
use sqlx::FromRow;
use dronefleet_core::registration::NewMedication;
use dronefleet_core::types::{DbId, Timestamp};

/// A medication row from the `medications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Medication {
    pub id: DbId,
    pub name: String,
    /// Grams.
    pub weight: f64,
    pub code: String,
    /// Opaque reference to a stored image, if any.
    pub image: Option<String>,
    pub created_at: Timestamp,
}

impl Medication {
    /// Materialize a validated registration with an assigned id.
    pub fn from_new(id: DbId, input: &NewMedication, created_at: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            weight: input.weight,
            code: input.code.clone(),
            image: input.image.clone(),
            created_at,
        }
    }
}
