use axum::routing::get;
use axum::Router;

use crate::handlers::medication;
use crate::state::AppState;

/// Routes mounted at `/medications`.
///
/// ```text
/// GET    /                                         -> list_medications
/// POST   /                                         -> register_medication
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(medication::list_medications).post(medication::register_medication),
    )
}
