// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! Registration, login and token verification through `AuthService`
use backend_lib::auth::{AuthService, DefaultAuth, TokenIssuer};
use backend_lib::error::AppError;
use backend_lib::storage::{CredentialStore, FlatFileStorage, MemoryStorage};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

use crate::test_utils::{test_settings, TEST_SECRET};

fn auth_over(store: Arc<dyn CredentialStore>) -> DefaultAuth {
    DefaultAuth::from_settings(store, &test_settings()).unwrap()
}

#[tokio::test]
async fn test_auth_service_flow() {
    let auth = auth_over(Arc::new(MemoryStorage::new()));

    let admin = auth.register("doc1", "password123").await.unwrap();
    assert_eq!(admin.username, "doc1");

    assert!(matches!(
        auth.register("doc1", "password123").await,
        Err(AppError::DuplicateUsername)
    ));

    let admin = auth.authenticate("doc1", "password123").await.unwrap();
    let token = auth.issue_token(&admin.username, None).unwrap();
    assert_eq!(auth.verify_token(&token.token).unwrap().sub, "doc1");
    assert_eq!(
        (token.expires_at - token.issued_at).num_seconds(),
        ttl_seconds(test_settings().auth.token_ttl_minutes)
    );

    let wrong_password = auth.authenticate("doc1", "password999").await.unwrap_err();
    let unknown_user = auth.authenticate("ghost", "password123").await.unwrap_err();
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status_code(), unknown_user.status_code());
    assert_eq!(wrong_password.error_code(), unknown_user.error_code());
}

fn ttl_seconds(minutes: u64) -> i64 {
    i64::try_from(minutes * 60).unwrap()
}

#[tokio::test]
async fn test_tokens_from_another_secret_are_rejected() {
    let auth = auth_over(Arc::new(MemoryStorage::new()));
    let foreign = TokenIssuer::new(
        b"another-secret-0123456789abcdef0123456789",
        Duration::from_secs(60),
    );
    let token = foreign.issue("doc1", None).unwrap();

    assert!(matches!(
        auth.verify_token(&token.token),
        Err(AppError::InvalidToken)
    ));

    let own = TokenIssuer::new(TEST_SECRET.as_bytes(), Duration::from_secs(60));
    let token = own.issue("doc1", None).unwrap();
    assert_eq!(auth.verify_token(&token.token).unwrap().sub, "doc1");
}

#[tokio::test]
async fn test_credentials_survive_restart() {
    let temp_dir = tempdir().unwrap();

    {
        let auth = auth_over(Arc::new(FlatFileStorage::new(temp_dir.path()).unwrap()));
        auth.register("doc1", "password123").await.unwrap();
    }

    let auth = auth_over(Arc::new(FlatFileStorage::new(temp_dir.path()).unwrap()));
    assert!(auth.authenticate("doc1", "password123").await.is_ok());
    assert!(matches!(
        auth.register("doc1", "password123").await,
        Err(AppError::DuplicateUsername)
    ));
}

#[tokio::test]
async fn test_concurrent_registration_admits_one() {
    let auth = Arc::new(auth_over(Arc::new(MemoryStorage::new())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move { auth.register("doc1", "password123").await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, AppError::DuplicateUsername)),
        }
    }
    assert_eq!(created, 1);
}
