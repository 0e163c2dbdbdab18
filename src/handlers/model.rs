//! Model info handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::models::{BackgroundInfo, ModelInfoResponse};

/// Describe the loaded artifact and its output feature schema
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let service = &state.service;
    let metadata = service.metadata();

    Json(ModelInfoResponse {
        name: metadata.name.clone(),
        model_path: metadata.model_path.clone(),
        loaded_at: metadata.loaded_at,
        classes: metadata.classes.clone(),
        feature_count: service.feature_names().len(),
        feature_names: service.feature_names().to_vec(),
        background: BackgroundInfo {
            rows: service.background().nrows(),
            kind: "zeros".to_string(),
        },
    })
}
