//! Explanation handler

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::handlers::AppJson;
use crate::models::{ExplanationResponse, PatientRecord};

/// Per-feature attributions for one patient record
pub async fn explain(
    State(state): State<AppState>,
    AppJson(patient): AppJson<PatientRecord>,
) -> AppResult<Json<ExplanationResponse>> {
    let explained = state.service.explain(&patient.to_row())?;

    tracing::debug!(
        "Explanation: {} features, base value {:.4}",
        explained.attributions.len(),
        explained.base_value
    );

    Ok(Json(explained.into()))
}
