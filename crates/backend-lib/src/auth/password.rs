// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! bcrypt only looks at the first 72 bytes of its input. Both functions here
//! truncate the UTF-8 encoding explicitly, so passwords that share their
//! first 72 bytes hash and verify identically. Registration caps passwords
//! at [`MAX_PASSWORD_LENGTH`] bytes so new accounts never rely on that.
use crate::error::AppError;
use zeroize::Zeroizing;

/// Number of input bytes bcrypt consumes
pub const BCRYPT_MAX_BYTES: usize = 72;

/// Minimum password length in bytes
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in bytes
pub const MAX_PASSWORD_LENGTH: usize = BCRYPT_MAX_BYTES;

/// Copy of the bytes bcrypt will see, wiped on drop
fn hashed_bytes(plain: &str) -> Zeroizing<Vec<u8>> {
    let bytes = plain.as_bytes();
    Zeroizing::new(bytes[..bytes.len().min(BCRYPT_MAX_BYTES)].to_vec())
}

/// Hash a password using bcrypt with a fresh random salt.
///
/// Only the first 72 bytes of `plain` participate.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    let bytes = hashed_bytes(plain);
    bcrypt::hash(bytes.as_slice(), cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// Applies the same 72-byte truncation as [`hash_password`]. A malformed
/// hash never verifies.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let bytes = hashed_bytes(plain);
    bcrypt::verify(bytes.as_slice(), hash).unwrap_or(false)
}
