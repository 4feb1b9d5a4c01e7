// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers, one module per resource.
//!
//! Body, path and query extractors are taken as `Result<_, Rejection>` so
//! malformed input surfaces as a structured validation error.

pub mod admin;
pub mod doctors;
pub mod insurance;
pub mod patients;

use axum::{extract::State, Json};
use hospital_common::{MessageResponse, StatusResponse};
use std::sync::Arc;

use crate::{error::AppError, storage::Storage, AppState};

pub(crate) fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

pub async fn root() -> Json<MessageResponse> {
    message("Hospital Management System API is Live!")
}

/// Round-trip to the storage backend
pub async fn check_connection<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<StatusResponse>, AppError> {
    state.storage.ping().await?;
    Ok(Json(StatusResponse {
        status: "Successfully connected to the database!".to_string(),
    }))
}
