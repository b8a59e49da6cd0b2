//! Fleet operations that sit between the handlers and the store.
//!
//! [`LoadingEngine`] owns the load lock budget and outcome logging;
//! [`audit::run_battery_audit`] is shared by the periodic job and the
//! manual trigger endpoint.

pub mod audit;
pub mod loading;

pub use loading::LoadingEngine;
