// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
/** Signed, time-bounded access tokens.
Tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. Nothing is stored
server side: a token is valid iff its signature checks out and the current
time is strictly before `exp`. There is no revocation. */
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AppError;

/// Default token lifetime (20 minutes)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(20 * 60);

/// Signing algorithm, fixed for the life of the process
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Freshly issued token with its decoded timestamps
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], default_ttl: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // expiry is checked in `verify_at` against an explicit clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject`, expiring after `ttl` (or the default)
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<AccessToken, AppError> {
        self.issue_at(subject, ttl.unwrap_or(self.default_ttl), Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::Internal("Token lifetime out of range".to_string()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))?;

        Ok(AccessToken {
            token,
            subject: claims.sub,
            issued_at: now,
            expires_at,
        })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AppError::InvalidToken
        })?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            tracing::debug!(sub = %claims.sub, "token expired");
            return Err(AppError::InvalidToken);
        }
        if claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}
