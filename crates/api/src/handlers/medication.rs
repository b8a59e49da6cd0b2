//! Handlers for the medication catalog.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dronefleet_core::pagination::MEDICATION_PAGE_SIZE;
use dronefleet_core::registration::MedicationRegistration;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/v1/medications
///
/// Register a medication. All field failures are reported together.
pub async fn register_medication(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<MedicationRegistration>,
) -> AppResult<impl IntoResponse> {
    let new_medication = input.into_validated()?;
    let medication = state.store.insert_medication(&new_medication).await?;

    tracing::info!(
        medication_id = medication.id,
        code = %medication.code,
        weight = medication.weight,
        "Medication registered",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: medication })))
}

/// GET /api/v1/medications
pub async fn list_medications(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .store
        .list_medications(params.to_request(MEDICATION_PAGE_SIZE))
        .await?;

    Ok(Json(PaginatedResponse::from(page)))
}
