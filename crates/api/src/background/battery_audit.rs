//! Periodic battery audit.
//!
//! Records a battery snapshot for every drone on a fixed interval using
//! `tokio::time::interval`. The first tick fires immediately.

use std::sync::Arc;
use std::time::Duration;

use dronefleet_db::store::FleetStore;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::engine::audit::run_battery_audit;

/// Run the battery audit loop until `cancel` is triggered.
///
/// A failed pass is logged and the loop carries on with the next tick.
pub async fn run(store: Arc<dyn FleetStore>, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs(), "Battery audit job started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Battery audit job stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = run_battery_audit(store.as_ref()).await {
                    tracing::error!(error = %e, "Battery audit: pass failed");
                }
            }
        }
    }
}
