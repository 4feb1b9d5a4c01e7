//! Doctor CRUD.
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use hospital_common::{Doctor, DoctorCreate, DoctorDeleted, RecordId};
use std::sync::Arc;

use crate::{error::AppError, storage::Storage, validation, AppState};

pub async fn create_doctor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<DoctorCreate>, JsonRejection>,
) -> Result<Json<Doctor>, AppError> {
    let Json(body) = payload?;
    validation::validate_doctor(&body)?;
    let doctor = state.storage.create_doctor(body).await?;
    tracing::info!(doctor_id = doctor.id, "doctor created");
    Ok(Json(doctor))
}

pub async fn get_doctor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<Doctor>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.storage.get_doctor(id).await?))
}

pub async fn update_doctor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<DoctorCreate>, JsonRejection>,
) -> Result<Json<Doctor>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    validation::validate_doctor(&body)?;
    Ok(Json(state.storage.update_doctor(id, body).await?))
}

pub async fn delete_doctor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<DoctorDeleted>, AppError> {
    let Path(id) = id?;
    let deleted = state.storage.delete_doctor(id).await?;
    tracing::info!(doctor_id = deleted.id, "doctor deleted");
    Ok(Json(DoctorDeleted {
        detail: "Doctor deleted successfully".to_string(),
    }))
}
