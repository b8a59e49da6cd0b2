//! Drone loading decision logic.
//!
//! Pure planning over pre-fetched data: the caller resolves the drone, looks
//! up every candidate medication in one batch, and collects the ids already
//! attached to the drone. [`plan_load`] then decides what (if anything) gets
//! attached. Persisting the plan atomically is the storage layer's job.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::battery;
use crate::drone::DroneState;
use crate::error::CoreError;
use crate::types::DbId;

/// The slice of drone state that the loading decision depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadTarget {
    pub drone_id: DbId,
    pub state: DroneState,
    pub battery_capacity: i32,
    pub weight_limit: f64,
    pub current_medication_weight: f64,
}

/// Why a load attempt finished without attaching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotModifiedReason {
    /// Battery below the healthy threshold.
    UnhealthyBattery,
    /// The drone is already carrying more than its limit.
    OverWeightLimit,
    /// No candidate qualified.
    NothingAccepted,
}

impl NotModifiedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnhealthyBattery => "unhealthy_battery",
            Self::OverWeightLimit => "over_weight_limit",
            Self::NothingAccepted => "nothing_accepted",
        }
    }
}

/// The decision for one load request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPlan {
    /// Attach `medication_ids` (in request order) and add `added_weight`.
    Attach {
        medication_ids: Vec<DbId>,
        added_weight: f64,
    },
    NotModified(NotModifiedReason),
}

impl LoadPlan {
    /// Total medication weight on the drone once this plan is applied.
    pub fn resulting_weight(&self, target: &LoadTarget) -> f64 {
        match self {
            Self::Attach { added_weight, .. } => target.current_medication_weight + added_weight,
            Self::NotModified(_) => target.current_medication_weight,
        }
    }
}

/// Decide which candidates to attach to `target`.
///
/// - A drone that is not `IDLE` fails with [`CoreError::DroneUnavailable`].
/// - An unhealthy battery or an already-overweight drone yields `NotModified`.
/// - Candidates are scanned in order and the scan stops at the first id
///   missing from `weights` (ids after it are never considered).
/// - A resolvable candidate is skipped, without stopping the scan, when it
///   would push the running total over `weight_limit` or when it is already
///   attached or already accepted earlier in this batch.
pub fn plan_load(
    target: &LoadTarget,
    candidates: &[DbId],
    weights: &HashMap<DbId, f64>,
    attached: &HashSet<DbId>,
) -> Result<LoadPlan, CoreError> {
    if target.state != DroneState::Idle {
        return Err(CoreError::DroneUnavailable {
            id: target.drone_id,
        });
    }

    if !battery::is_healthy(target.battery_capacity) {
        return Ok(LoadPlan::NotModified(NotModifiedReason::UnhealthyBattery));
    }

    if target.current_medication_weight > target.weight_limit {
        return Ok(LoadPlan::NotModified(NotModifiedReason::OverWeightLimit));
    }

    let mut accepted = Vec::new();
    let mut seen = HashSet::new();
    let mut added = 0.0;

    for id in candidates {
        let Some(&weight) = weights.get(id) else {
            break;
        };
        if attached.contains(id) || seen.contains(id) {
            continue;
        }
        if target.current_medication_weight + added + weight > target.weight_limit {
            continue;
        }
        added += weight;
        seen.insert(*id);
        accepted.push(*id);
    }

    if accepted.is_empty() {
        return Ok(LoadPlan::NotModified(NotModifiedReason::NothingAccepted));
    }

    Ok(LoadPlan::Attach {
        medication_ids: accepted,
        added_weight: added,
    })
}
