//! `GET /health`: liveness plus the fleet settings a load client cares about.
//!
//! The service reports `degraded` rather than failing when the store is
//! unreachable, so orchestrators can tell a slow database from a dead process.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FleetHealth {
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
    /// How long a load request waits for a busy drone before `503`.
    pub load_lock_timeout_ms: u64,
    pub battery_audit_interval_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    /// `postgres` or `memory`.
    pub backend: &'static str,
    pub reachable: bool,
}

async fn fleet_health(State(state): State<AppState>) -> Json<FleetHealth> {
    let reachable = state.store.health_check().await.is_ok();
    if !reachable {
        tracing::warn!(backend = state.store.backend(), "Store health check failed");
    }

    Json(FleetHealth {
        status: if reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: StoreHealth {
            backend: state.store.backend(),
            reachable,
        },
        load_lock_timeout_ms: state.config.load_lock_timeout_ms,
        battery_audit_interval_secs: state.config.battery_audit_interval_secs,
    })
}

/// Served at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(fleet_health))
}
