use std::sync::Arc;

use dronefleet_db::store::FleetStore;

use crate::config::ServerConfig;
use crate::engine::LoadingEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Fleet persistence (Postgres or in-memory).
    pub store: Arc<dyn FleetStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Load request coordinator sharing `store`.
    pub loading: LoadingEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn FleetStore>, config: ServerConfig) -> Self {
        let loading = LoadingEngine::new(Arc::clone(&store), config.load_lock_timeout());
        Self {
            store,
            config: Arc::new(config),
            loading,
        }
    }
}
