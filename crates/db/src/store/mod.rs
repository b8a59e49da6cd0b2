//! The fleet storage port.
//!
//! [`FleetStore`] is the single seam between the service and persistence.
//! Two adapters implement it:
//!
//! - [`PgFleetStore`]: Postgres via the repositories in this crate.
//! - [`MemoryFleetStore`]: process-local tables, used when no database is
//!   configured and throughout the test suites.
//!
//! Both adapters run [`dronefleet_core::loading::plan_load`] inside a
//! per-drone critical section, so the loading rules live in one place and
//! only the locking and commit mechanics differ.

use std::time::Duration;

use async_trait::async_trait;
use dronefleet_core::error::CoreError;
use dronefleet_core::loading::NotModifiedReason;
use dronefleet_core::pagination::{Page, PageRequest};
use dronefleet_core::registration::{NewDrone, NewMedication};
use dronefleet_core::types::DbId;

use crate::models::battery_history::BatteryHistoryEntry;
use crate::models::drone::Drone;
use crate::models::medication::Medication;

pub mod memory;
pub mod postgres;

pub use memory::MemoryFleetStore;
pub use postgres::PgFleetStore;

/// Message for a duplicate medication `code`.
pub const DUPLICATE_MEDICATION_CODE: &str = "Medication with this code already exists";

/// Message for a duplicate drone `serial_number`.
pub const DUPLICATE_DRONE_SERIAL: &str = "Drone with this serial number already exists";

/// Errors raised by a [`FleetStore`] adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain error (conflict, unavailable drone, contention, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An unclassified database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a load attempt that was allowed to run.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The accepted medications were attached and the drone is now `LOADED`.
    Loaded {
        drone: Drone,
        medications: Vec<Medication>,
    },
    /// Nothing qualified; the drone is unchanged.
    NotModified {
        drone: Drone,
        reason: NotModifiedReason,
    },
}

impl LoadOutcome {
    pub fn drone(&self) -> &Drone {
        match self {
            Self::Loaded { drone, .. } | Self::NotModified { drone, .. } => drone,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Persistence operations required by the fleet service.
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Persist a validated medication. Duplicate codes fail with
    /// [`CoreError::Conflict`].
    async fn insert_medication(&self, input: &NewMedication) -> StoreResult<Medication>;

    /// The medication catalog, ordered by id.
    async fn list_medications(&self, page: PageRequest) -> StoreResult<Page<Medication>>;

    /// Persist a validated drone. Duplicate serial numbers fail with
    /// [`CoreError::Conflict`].
    async fn insert_drone(&self, input: &NewDrone) -> StoreResult<Drone>;

    async fn find_drone(&self, id: DbId) -> StoreResult<Option<Drone>>;

    /// All drones, ordered by id.
    async fn list_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>>;

    /// Drones that can take a load right now (see [`Drone::is_available`]).
    async fn list_available_drones(&self, page: PageRequest) -> StoreResult<Page<Drone>>;

    /// Medications attached to a drone, ordered by id. Unknown drones fail
    /// with [`CoreError::NotFound`].
    async fn list_loaded_medications(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<Medication>>;

    /// Run one load request as a single atomic unit for `drone_id`.
    ///
    /// Waits at most `lock_wait` for the drone's lock, failing with
    /// [`CoreError::Contention`] otherwise. A missing or non-`IDLE` drone
    /// fails with [`CoreError::DroneUnavailable`].
    async fn load_medications(
        &self,
        drone_id: DbId,
        candidates: &[DbId],
        lock_wait: Duration,
    ) -> StoreResult<LoadOutcome>;

    /// Append a battery snapshot for every drone. Returns the number of
    /// entries written.
    async fn record_battery_snapshots(&self) -> StoreResult<u64>;

    /// A drone's battery snapshots, newest first. Unknown drones fail with
    /// [`CoreError::NotFound`].
    async fn list_battery_history(
        &self,
        drone_id: DbId,
        page: PageRequest,
    ) -> StoreResult<Page<BatteryHistoryEntry>>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Short name of the backing storage, reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

pub(crate) fn drone_not_found(id: DbId) -> StoreError {
    StoreError::Core(CoreError::NotFound {
        entity: "Drone",
        id,
    })
}
