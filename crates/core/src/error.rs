use std::collections::BTreeMap;

use crate::types::DbId;

/// Validation messages keyed by the name of the offending field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The drone does not exist or is not in a state that accepts a load.
    #[error("Drone {id} is not available (IDLE) or does not exist")]
    DroneUnavailable { id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed for fields: {}", field_list(.0))]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A per-drone lock could not be acquired in time. Safe to retry.
    #[error("Contention: {0}")]
    Contention(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn field_list(errors: &FieldErrors) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
