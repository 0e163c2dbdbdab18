//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

pub const RUNNING_MESSAGE: &str = "Heart Failure Prediction API Running";

#[derive(Serialize)]
pub struct HomeResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model_loaded: bool,
    feature_count: usize,
}

pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse { message: RUNNING_MESSAGE })
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model_loaded: true,
        feature_count: state.service.feature_names().len(),
    })
}
