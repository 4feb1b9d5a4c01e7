// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.
//!
//! Everything that reaches the feature deriver or the stores has been
//! through here first; downstream code does not re-check ranges.

use hospital_common::{DoctorCreate, Occupation, PatientCreate, UserInput};
use thiserror::Error;

use crate::auth::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::AppError;
use crate::features::{bmi, normalize_city};

// Common validation constants
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_AGE_EXCLUSIVE: i32 = 120;
const MAX_HEIGHT_EXCLUSIVE: f64 = 2.5;

/// Possible validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("Invalid {0}: must not be empty")]
    Empty(&'static str),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validated, normalized attributes of a prediction request
#[derive(Debug, Clone, PartialEq)]
pub struct UserAttributes {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub income_lpa: f64,
    pub smoker: bool,
    /// Trimmed and title-cased
    pub city: String,
    pub occupation: Occupation,
}

impl TryFrom<UserInput> for UserAttributes {
    type Error = ValidationError;

    fn try_from(input: UserInput) -> ValidationResult<Self> {
        validate_user_input(input)
    }
}

fn out_of_range(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(out_of_range(field, "must be greater than 0"));
    }
    Ok(value)
}

/// Validate an admin username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be at least {MIN_USERNAME_LENGTH} characters long"
        )));
    }
    Ok(username)
}

/// Validate an admin password.
///
/// Bounds are in bytes of the UTF-8 encoding; bcrypt ignores anything past
/// 72 bytes, so longer passwords are refused rather than silently cut.
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} bytes"
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} bytes"
        )));
    }

    Ok(password)
}

/// Validate a registration request
pub fn validate_admin_registration(username: &str, password: &str) -> ValidationResult<()> {
    validate_username(username)?;
    validate_password(password)?;
    Ok(())
}

/// Validate and normalize a prediction request
pub fn validate_user_input(input: UserInput) -> ValidationResult<UserAttributes> {
    if input.age <= 0 || input.age >= MAX_AGE_EXCLUSIVE {
        return Err(out_of_range(
            "age",
            format!("must be greater than 0 and less than {MAX_AGE_EXCLUSIVE}"),
        ));
    }

    let weight = positive("weight", input.weight)?;
    let height = positive("height", input.height)?;
    if height >= MAX_HEIGHT_EXCLUSIVE {
        return Err(out_of_range(
            "height",
            format!("must be less than {MAX_HEIGHT_EXCLUSIVE}"),
        ));
    }
    if !bmi(weight, height).is_finite() {
        return Err(out_of_range(
            "weight",
            "weight and height do not give a finite BMI",
        ));
    }
    let income_lpa = positive("income_lpa", input.income_lpa)?;

    Ok(UserAttributes {
        age: input.age,
        weight,
        height,
        income_lpa,
        smoker: input.smoker,
        city: normalize_city(&input.city),
        occupation: input.occupation,
    })
}

/// Validate a patient body
pub fn validate_patient(patient: &PatientCreate) -> ValidationResult<()> {
    if patient.name.trim().is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if patient.age < 0 {
        return Err(out_of_range("age", "must not be negative"));
    }
    for (field, value) in [("weight", patient.weight), ("height", patient.height)] {
        if !value.is_finite() || value < 0.0 {
            return Err(out_of_range(field, "must be a non-negative number"));
        }
    }
    Ok(())
}

/// Validate a doctor body
pub fn validate_doctor(doctor: &DoctorCreate) -> ValidationResult<()> {
    if doctor.name.trim().is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if doctor.specialty.trim().is_empty() {
        return Err(ValidationError::Empty("specialty"));
    }
    Ok(())
}
