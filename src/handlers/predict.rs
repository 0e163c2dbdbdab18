//! Prediction handler

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::handlers::AppJson;
use crate::models::{PatientRecord, PredictionResponse};

/// Classify one patient record
pub async fn predict(
    State(state): State<AppState>,
    AppJson(patient): AppJson<PatientRecord>,
) -> AppResult<Json<PredictionResponse>> {
    let prediction = state.service.predict(&patient.to_row())?;

    tracing::debug!(
        "Prediction: label={} probability={:.4}",
        prediction.label,
        prediction.probability
    );

    Ok(Json(prediction.into()))
}
