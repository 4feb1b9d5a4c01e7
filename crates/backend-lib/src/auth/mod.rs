// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod extractor;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use extractor::AuthenticatedAdmin;
pub use password::{
    hash_password, verify_password, BCRYPT_MAX_BYTES, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{AccessToken, Claims, TokenIssuer, DEFAULT_TOKEN_TTL, TOKEN_ALGORITHM};
