//! Route definitions for drones and their cargo.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{drone, loading};
use crate::state::AppState;

/// Routes mounted at `/drones`.
///
/// ```text
/// GET    /                                         -> list_drones
/// POST   /                                         -> register_drone
/// GET    /available                                -> list_available_drones
/// POST   /battery-audit                            -> trigger_battery_audit
/// GET    /{id}                                     -> get_drone
/// GET    /{id}/medications                         -> list_loaded_medications
/// POST   /{id}/medications                         -> load_medications
/// GET    /{id}/battery                             -> get_battery_status
/// GET    /{id}/battery/history                     -> list_battery_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(drone::list_drones).post(drone::register_drone))
        .route("/available", get(drone::list_available_drones))
        .route("/battery-audit", post(drone::trigger_battery_audit))
        .route("/{id}", get(drone::get_drone))
        .route(
            "/{id}/medications",
            get(loading::list_loaded_medications).post(loading::load_medications),
        )
        .route("/{id}/battery", get(drone::get_battery_status))
        .route("/{id}/battery/history", get(drone::list_battery_history))
}
