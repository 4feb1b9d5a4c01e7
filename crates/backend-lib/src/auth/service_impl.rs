use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use zeroize::Zeroizing;

use super::{hash_password, verify_password, AccessToken, AuthService, Claims, TokenIssuer};
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics::{AUTH_LOGIN_FAILURE, AUTH_LOGIN_SUCCESS, AUTH_REGISTER, AUTH_TOKEN_REJECTED};
use crate::storage::{AdminCredential, CredentialStore};
use crate::validation;

/// Verified against when the username does not exist, so both failure
/// paths pay for one bcrypt verification
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

pub struct DefaultAuth {
    store: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl DefaultAuth {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, bcrypt_cost)?;
        Ok(Self {
            store,
            tokens,
            bcrypt_cost,
            dummy_hash,
        })
    }

    pub fn from_settings(
        store: Arc<dyn CredentialStore>,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        let tokens = TokenIssuer::new(settings.auth.secret_key.as_bytes(), settings.token_ttl());
        Self::new(store, tokens, settings.auth.bcrypt_cost)
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[tracing::instrument(skip(self, password))]
    async fn register(&self, username: &str, password: &str) -> Result<AdminCredential, AppError> {
        validation::validate_admin_registration(username, password)?;

        if self.store.find_by_username(username).await?.is_some() {
            tracing::info!("registration rejected, username taken");
            return Err(AppError::DuplicateUsername);
        }

        let plain = Zeroizing::new(password.to_owned());
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || hash_password(&plain, cost)).await??;

        // the store enforces uniqueness again for concurrent registrations
        let admin = self.store.insert_admin(username, &hash).await?;
        counter!(AUTH_REGISTER).increment(1);
        tracing::info!(admin_id = admin.id, "admin registered");
        Ok(admin)
    }

    #[tracing::instrument(skip(self, password))]
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminCredential, AppError> {
        let admin = self.store.find_by_username(username).await?;
        let hash = admin
            .as_ref()
            .map_or_else(|| self.dummy_hash.clone(), |a| a.password_hash.clone());

        let plain = Zeroizing::new(password.to_owned());
        let matches = tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?;

        match admin {
            Some(admin) if matches => {
                counter!(AUTH_LOGIN_SUCCESS).increment(1);
                tracing::info!(admin_id = admin.id, "admin authenticated");
                Ok(admin)
            }
            _ => {
                counter!(AUTH_LOGIN_FAILURE).increment(1);
                tracing::warn!("authentication failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn issue_token(&self, username: &str, ttl: Option<Duration>) -> Result<AccessToken, AppError> {
        self.tokens.issue(username, ttl)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        self.tokens.verify(token).inspect_err(|_| {
            counter!(AUTH_TOKEN_REJECTED).increment(1);
        })
    }
}
