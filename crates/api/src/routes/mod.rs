pub mod drone;
pub mod health;
pub mod medication;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /medications                                     list, register
///
/// /drones                                          list, register
/// /drones/available                                drones ready to load
/// /drones/battery-audit                            run an audit pass (POST)
/// /drones/{id}                                     drone record
/// /drones/{id}/medications                         loaded cargo, load (POST)
/// /drones/{id}/battery                             battery status
/// /drones/{id}/battery/history                     audit snapshots
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/medications", medication::router())
        .nest("/drones", drone::router())
}
