//! Request body extractor that reports malformed JSON in the API's error shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use dronefleet_core::error::CoreError;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] on request bodies.
///
/// A body that is not JSON, is not an object, or carries a value the target
/// type cannot hold is rejected with `400 VALIDATION_ERROR` instead of
/// axum's plain-text `415`/`422`. Per-field type problems on numeric fields
/// never get here; the registration types accept them and report per field.
///
/// ```ignore
/// async fn register(JsonBody(input): JsonBody<DroneRegistration>) -> AppResult<()> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}
