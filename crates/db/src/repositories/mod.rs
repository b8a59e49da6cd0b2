//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` (or an open transaction) as the first argument.

pub mod battery_history_repo;
pub mod drone_repo;
pub mod medication_repo;

pub use battery_history_repo::BatteryHistoryRepo;
pub use drone_repo::DroneRepo;
pub use medication_repo::MedicationRepo;
