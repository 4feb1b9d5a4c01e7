//! Patient CRUD.
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use hospital_common::{
    Patient, PatientCreate, PatientDeleted, PatientList, PatientUpdated, RecordId,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppError, storage::Storage, validation, AppState};

/// Optional guard on deletion
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// When given, must equal the stored name
    pub name: Option<String>,
}

pub async fn create_patient<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PatientCreate>, JsonRejection>,
) -> Result<Json<Patient>, AppError> {
    let Json(body) = payload?;
    validation::validate_patient(&body)?;
    let patient = state.storage.create_patient(body).await?;
    tracing::info!(patient_id = patient.id, "patient created");
    Ok(Json(patient))
}

pub async fn get_patient<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<Patient>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.storage.get_patient(id).await?))
}

pub async fn list_patients<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    limit: Result<Path<usize>, PathRejection>,
) -> Result<Json<PatientList>, AppError> {
    let Path(limit) = limit?;
    let patients = state.storage.list_patients(limit).await?;
    Ok(Json(PatientList { patients }))
}

/// Replaces every field of the stored patient
pub async fn update_patient<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<PatientCreate>, JsonRejection>,
) -> Result<Json<PatientUpdated>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    validation::validate_patient(&body)?;
    let patient = state.storage.update_patient(id, body).await?;
    Ok(Json(PatientUpdated {
        message: "Update successful".to_string(),
        patient,
    }))
}

pub async fn delete_patient<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<RecordId>, PathRejection>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Json<PatientDeleted>, AppError> {
    let Path(id) = id?;
    let Query(params) = params?;

    let deleted = state
        .storage
        .delete_patient(id, params.name.as_deref())
        .await?;
    tracing::info!(patient_id = deleted.id, "patient deleted");
    Ok(Json(PatientDeleted {
        message: "Deletion successful".to_string(),
        id_deleted: deleted.id,
    }))
}
