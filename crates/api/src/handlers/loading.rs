//! Handlers for loading medications onto a drone and reading its cargo.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dronefleet_core::drone::DroneState;
use dronefleet_core::error::{CoreError, FieldErrors};
use dronefleet_core::loading::NotModifiedReason;
use dronefleet_core::pagination::MEDICATION_PAGE_SIZE;
use dronefleet_core::registration::MSG_REQUIRED;
use dronefleet_core::types::DbId;
use dronefleet_db::models::medication::Medication;
use dronefleet_db::store::LoadOutcome;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Body of `POST /drones/{id}/medications`.
#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    /// Candidate medication ids, in the order they should be considered.
    pub medications: Option<Vec<DbId>>,
}

/// Outcome of a load request, tagged by `status`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadResponse {
    Loaded {
        drone_id: DbId,
        state: DroneState,
        current_medication_weight: f64,
        medications: Vec<Medication>,
    },
    NotModified {
        drone_id: DbId,
        state: DroneState,
        current_medication_weight: f64,
        reason: NotModifiedReason,
    },
}

impl From<LoadOutcome> for LoadResponse {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Loaded { drone, medications } => Self::Loaded {
                drone_id: drone.id,
                state: drone.state,
                current_medication_weight: drone.current_medication_weight,
                medications,
            },
            LoadOutcome::NotModified { drone, reason } => Self::NotModified {
                drone_id: drone.id,
                state: drone.state,
                current_medication_weight: drone.current_medication_weight,
                reason,
            },
        }
    }
}

/// POST /api/v1/drones/{id}/medications
///
/// `201` when medications were attached, `200` with
/// `"status": "not_modified"` when nothing qualified.
pub async fn load_medications(
    State(state): State<AppState>,
    Path(drone_id): Path<DbId>,
    JsonBody(input): JsonBody<LoadRequest>,
) -> AppResult<Response> {
    let Some(candidates) = input.medications else {
        let mut errors = FieldErrors::new();
        errors.insert("medications".into(), vec![MSG_REQUIRED.into()]);
        return Err(CoreError::InvalidFields(errors).into());
    };

    let outcome = state.loading.load(drone_id, &candidates).await?;
    let status = if outcome.is_loaded() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse {
            data: LoadResponse::from(outcome),
        }),
    )
        .into_response())
}

/// GET /api/v1/drones/{id}/medications
pub async fn list_loaded_medications(
    State(state): State<AppState>,
    Path(drone_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .store
        .list_loaded_medications(drone_id, params.to_request(MEDICATION_PAGE_SIZE))
        .await?;

    Ok(Json(PaginatedResponse::from(page)))
}
