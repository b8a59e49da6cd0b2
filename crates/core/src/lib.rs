//! Domain logic for the drone fleet service.
//!
//! No database or HTTP dependencies: validation, battery policy, the loading
//! decision and pagination all operate on plain values supplied by callers.

pub mod battery;
pub mod drone;
pub mod error;
pub mod loading;
pub mod pagination;
pub mod registration;
pub mod types;
