// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_REGISTER: &str = "auth.register";
pub const AUTH_LOGIN_SUCCESS: &str = "auth.login.success";
pub const AUTH_LOGIN_FAILURE: &str = "auth.login.failure";
pub const AUTH_TOKEN_REJECTED: &str = "auth.token.rejected";
pub const PREDICTION_SUCCESS: &str = "prediction.success";
pub const PREDICTION_FAILURE: &str = "prediction.failure";
