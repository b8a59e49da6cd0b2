//! Drone classification and lifecycle states.
//!
//! Both enums are stored as their string form (`model` / `state` columns),
//! so each provides `as_str` / `from_str_value` conversions alongside serde.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Weight limit (grams) applied when a drone is registered without one.
pub const DEFAULT_WEIGHT_LIMIT: f64 = 500.0;

pub const MODEL_LIGHTWEIGHT: &str = "Lightweight";
pub const MODEL_MIDDLEWEIGHT: &str = "Middleweight";
pub const MODEL_CRUISERWEIGHT: &str = "Cruiserweight";
pub const MODEL_HEAVYWEIGHT: &str = "Heavyweight";

/// All valid drone model strings.
pub const VALID_MODELS: &[&str] = &[
    MODEL_LIGHTWEIGHT,
    MODEL_MIDDLEWEIGHT,
    MODEL_CRUISERWEIGHT,
    MODEL_HEAVYWEIGHT,
];

pub const STATE_IDLE: &str = "IDLE";
pub const STATE_LOADING: &str = "LOADING";
pub const STATE_LOADED: &str = "LOADED";
pub const STATE_DELIVERING: &str = "DELIVERING";
pub const STATE_DELIVERED: &str = "DELIVERED";
pub const STATE_RETURNING: &str = "RETURNING";

/// All valid drone state strings.
pub const VALID_STATES: &[&str] = &[
    STATE_IDLE,
    STATE_LOADING,
    STATE_LOADED,
    STATE_DELIVERING,
    STATE_DELIVERED,
    STATE_RETURNING,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Airframe class of a drone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneModel {
    #[default]
    Lightweight,
    Middleweight,
    Cruiserweight,
    Heavyweight,
}

impl DroneModel {
    /// Convert from a stored or user-supplied string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            MODEL_LIGHTWEIGHT => Ok(Self::Lightweight),
            MODEL_MIDDLEWEIGHT => Ok(Self::Middleweight),
            MODEL_CRUISERWEIGHT => Ok(Self::Cruiserweight),
            MODEL_HEAVYWEIGHT => Ok(Self::Heavyweight),
            _ => Err(format!(
                "Invalid drone model '{s}'. Must be one of: {}",
                VALID_MODELS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lightweight => MODEL_LIGHTWEIGHT,
            Self::Middleweight => MODEL_MIDDLEWEIGHT,
            Self::Cruiserweight => MODEL_CRUISERWEIGHT,
            Self::Heavyweight => MODEL_HEAVYWEIGHT,
        }
    }
}

/// Lifecycle state of a drone.
///
/// Only the `Idle -> Loaded` edge is driven by this service; the delivery
/// cycle (`Delivering -> Delivered -> Returning -> Idle`) belongs to the
/// dispatch workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DroneState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Delivering,
    Delivered,
    Returning,
}

impl DroneState {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATE_IDLE => Ok(Self::Idle),
            STATE_LOADING => Ok(Self::Loading),
            STATE_LOADED => Ok(Self::Loaded),
            STATE_DELIVERING => Ok(Self::Delivering),
            STATE_DELIVERED => Ok(Self::Delivered),
            STATE_RETURNING => Ok(Self::Returning),
            _ => Err(format!(
                "Invalid drone state '{s}'. Must be one of: {}",
                VALID_STATES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => STATE_IDLE,
            Self::Loading => STATE_LOADING,
            Self::Loaded => STATE_LOADED,
            Self::Delivering => STATE_DELIVERING,
            Self::Delivered => STATE_DELIVERED,
            Self::Returning => STATE_RETURNING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_round_trips_through_str() {
        for s in VALID_MODELS {
            assert_eq!(DroneModel::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn model_rejects_unknown_value() {
        let err = DroneModel::from_str_value("Featherweight").unwrap_err();
        assert!(err.contains("Featherweight"));
        assert!(err.contains("Heavyweight"));
    }

    #[test]
    fn model_is_case_sensitive() {
        assert!(DroneModel::from_str_value("lightweight").is_err());
    }

    #[test]
    fn state_defaults_to_idle() {
        assert_eq!(DroneState::default(), DroneState::Idle);
    }

    #[test]
    fn state_serializes_uppercase() {
        let json = serde_json::to_string(&DroneState::Loaded).unwrap();
        assert_eq!(json, "\"LOADED\"");
    }

    #[test]
    fn state_rejects_lowercase() {
        assert!(DroneState::from_str_value("idle").is_err());
    }
}
