use async_trait::async_trait;
use std::time::Duration;

use super::{AccessToken, Claims};
use crate::error::AppError;
use crate::storage::AdminCredential;

/// Admin registration, login and token handling
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a new admin account
    async fn register(&self, username: &str, password: &str) -> Result<AdminCredential, AppError>;

    /// Check credentials. Unknown user and wrong password fail the same way.
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<AdminCredential, AppError>;

    /// Issue a bearer token; `None` uses the configured lifetime
    fn issue_token(&self, username: &str, ttl: Option<Duration>) -> Result<AccessToken, AppError>;

    fn verify_token(&self, token: &str) -> Result<Claims, AppError>;
}
