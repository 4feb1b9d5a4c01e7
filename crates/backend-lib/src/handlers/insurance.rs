//! Insurance premium prediction endpoints.
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hospital_common::{HealthStatus, MessageResponse, PredictionResponse, UserInput};
use std::sync::Arc;

use super::message;
use crate::{error::AppError, storage::Storage, validation::UserAttributes, AppState};

pub async fn home() -> Json<MessageResponse> {
    message("Insurance Premium Prediction API")
}

pub async fn health<S: Storage>(State(state): State<Arc<AppState<S>>>) -> Json<HealthStatus> {
    Json(state.gateway.health_check())
}

#[tracing::instrument(skip_all)]
pub async fn predict<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(input) = payload?;
    let attrs = UserAttributes::try_from(input)?;
    Ok(Json(state.gateway.predict_attributes(&attrs)?))
}
