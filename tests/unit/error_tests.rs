// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{
    body::to_bytes,
    http::{header, StatusCode},
    response::IntoResponse,
};
use backend_lib::error::AppError;
use backend_lib::validation::ValidationError;
use serde_json::Value;

async fn body_of(err: AppError) -> (StatusCode, Option<String>, Value) {
    let response = err.into_response();
    let status = response.status();
    let auth_header = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, auth_header, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_auth_errors_carry_bearer_challenge() {
    for err in [AppError::InvalidCredentials, AppError::InvalidToken] {
        let (status, auth_header, _) = body_of(err).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(auth_header.as_deref(), Some("Bearer"));
    }

    let (status, auth_header, body) = body_of(AppError::DuplicateUsername).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(auth_header, None);
    assert_eq!(body["error"]["code"], "AUTH_004");
}

#[tokio::test]
async fn test_error_body_shape() {
    let (status, _, body) = body_of(AppError::Model("model not loaded".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "MODEL_001");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("model not loaded"));
}

#[tokio::test]
async fn test_validation_error_conversion() {
    let err: AppError = ValidationError::Empty("name").into();
    let (status, _, body) = body_of(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_001");
}
