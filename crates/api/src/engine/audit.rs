use dronefleet_db::store::{FleetStore, StoreResult};

/// Append one battery snapshot per drone. Never modifies drones.
///
/// Returns the number of snapshots written.
pub async fn run_battery_audit(store: &dyn FleetStore) -> StoreResult<u64> {
    let recorded = store.record_battery_snapshots().await?;
    if recorded > 0 {
        tracing::info!(recorded, "Battery audit: snapshots recorded");
    } else {
        tracing::debug!("Battery audit: no drones registered");
    }
    Ok(recorded)
}
