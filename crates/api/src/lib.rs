//! Drone fleet API server library.
//!
//! Exposes the building blocks (config, state, error handling, extractors,
//! routes, loading engine, background jobs) so integration tests and the binary
//! entrypoint share them.

pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
