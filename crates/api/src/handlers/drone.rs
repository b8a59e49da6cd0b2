//! Handlers for drone registration, listings and battery reporting.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dronefleet_core::error::CoreError;
use dronefleet_core::pagination::DRONE_PAGE_SIZE;
use dronefleet_core::registration::DroneRegistration;
use dronefleet_core::types::DbId;
use dronefleet_db::models::drone::Drone;
use serde::Serialize;

use crate::engine::audit::run_battery_audit;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Result of a manual battery audit.
#[derive(Debug, Serialize)]
pub struct AuditSummary {
    pub recorded: u64,
}

async fn find_drone(state: &AppState, drone_id: DbId) -> AppResult<Drone> {
    state
        .store
        .find_drone(drone_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Drone",
            id: drone_id,
        }))
}

// ---------------------------------------------------------------------------
// Registration and listings
// ---------------------------------------------------------------------------

/// POST /api/v1/drones
///
/// Register a drone. `model` defaults to `Lightweight` and `weight_limit`
/// to 500 when omitted.
pub async fn register_drone(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<DroneRegistration>,
) -> AppResult<impl IntoResponse> {
    let new_drone = input.into_validated()?;
    let drone = state.store.insert_drone(&new_drone).await?;

    tracing::info!(
        drone_id = drone.id,
        serial_number = %drone.serial_number,
        model = drone.model.as_str(),
        "Drone registered",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: drone })))
}

/// GET /api/v1/drones
pub async fn list_drones(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .store
        .list_drones(params.to_request(DRONE_PAGE_SIZE))
        .await?;

    Ok(Json(PaginatedResponse::from(page)))
}

/// GET /api/v1/drones/available
///
/// Drones that are `IDLE`, have a healthy battery and are within their
/// own weight limit.
pub async fn list_available_drones(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .store
        .list_available_drones(params.to_request(DRONE_PAGE_SIZE))
        .await?;

    Ok(Json(PaginatedResponse::from(page)))
}

/// GET /api/v1/drones/{id}
pub async fn get_drone(
    State(state): State<AppState>,
    Path(drone_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let drone = find_drone(&state, drone_id).await?;
    Ok(Json(DataResponse { data: drone }))
}

// ---------------------------------------------------------------------------
// Battery
// ---------------------------------------------------------------------------

/// GET /api/v1/drones/{id}/battery
pub async fn get_battery_status(
    State(state): State<AppState>,
    Path(drone_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let drone = find_drone(&state, drone_id).await?;
    Ok(Json(DataResponse {
        data: drone.battery_status(),
    }))
}

/// GET /api/v1/drones/{id}/battery/history
///
/// Audit snapshots for one drone, newest first.
pub async fn list_battery_history(
    State(state): State<AppState>,
    Path(drone_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .store
        .list_battery_history(drone_id, params.to_request(DRONE_PAGE_SIZE))
        .await?;

    Ok(Json(PaginatedResponse::from(page)))
}

/// POST /api/v1/drones/battery-audit
///
/// Run one audit pass immediately, outside the periodic schedule.
pub async fn trigger_battery_audit(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let recorded = run_battery_audit(state.store.as_ref()).await?;
    Ok(Json(DataResponse {
        data: AuditSummary { recorded },
    }))
}
