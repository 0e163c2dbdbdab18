//! HTTP handlers

pub mod health;
pub mod model;
pub mod predict;
pub mod explain;


use axum::extract::FromRequest;

use crate::AppError;

/// JSON body extractor whose rejections become `AppError::ValidationError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
