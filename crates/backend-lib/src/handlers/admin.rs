//! Admin registration, login and identity.
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use hospital_common::{AdminCreate, AdminCreated, CurrentAdmin, LoginForm, TokenResponse};
use std::sync::Arc;

use crate::{auth::AuthenticatedAdmin, error::AppError, storage::Storage, AppState};

/// `POST /admin/add`
#[tracing::instrument(skip_all)]
pub async fn add_admin<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<AdminCreate>, JsonRejection>,
) -> Result<Json<AdminCreated>, AppError> {
    let Json(body) = payload?;
    let admin = state.auth.register(&body.username, &body.password).await?;
    Ok(Json(AdminCreated {
        message: "Admin user created successfully".to_string(),
        username: admin.username,
    }))
}

/// `POST /admin/token`, form-encoded credentials
#[tracing::instrument(skip_all)]
pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(credentials) = form?;
    let admin = state
        .auth
        .authenticate(&credentials.username, &credentials.password)
        .await?;
    let token = state.auth.issue_token(&admin.username, None)?;
    Ok(Json(TokenResponse::bearer(token.token)))
}

/// `GET /admin/me`
pub async fn me(admin: AuthenticatedAdmin) -> Json<CurrentAdmin> {
    Json(CurrentAdmin {
        username: admin.username,
    })
}
