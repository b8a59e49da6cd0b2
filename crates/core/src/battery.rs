//! Battery health policy.

/// Minimum battery percentage at which a drone may take on a load.
pub const HEALTHY_BATTERY_THRESHOLD: i32 = 25;

/// Whether a battery reading is healthy enough to load or fly.
pub fn is_healthy(battery_capacity: i32) -> bool {
    battery_capacity >= HEALTHY_BATTERY_THRESHOLD
}
