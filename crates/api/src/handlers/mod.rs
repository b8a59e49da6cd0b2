//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input, delegate to the [`FleetStore`] or the
//! [`LoadingEngine`] held in [`AppState`], and map errors via [`AppError`].
//!
//! [`FleetStore`]: dronefleet_db::store::FleetStore
//! [`LoadingEngine`]: crate::engine::LoadingEngine
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod drone;
pub mod loading;
pub mod medication;
