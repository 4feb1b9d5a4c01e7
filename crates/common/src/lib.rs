// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the hospital API and its clients.
//! This module defines the JSON request and response bodies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Record identifier assigned by the store
pub type RecordId = i64;

/// Occupation of the person a premium prediction is requested for
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupation {
    Engineer,
    Driver,
    Teacher,
    Banker,
    #[serde(rename = "Sales Manager")]
    SalesManager,
    Businessman,
    #[serde(rename = "Factory Worker")]
    FactoryWorker,
}

impl Occupation {
    /// Every accepted occupation, in wire order
    pub const ALL: [Occupation; 7] = [
        Occupation::Engineer,
        Occupation::Driver,
        Occupation::Teacher,
        Occupation::Banker,
        Occupation::SalesManager,
        Occupation::Businessman,
        Occupation::FactoryWorker,
    ];

    /// Name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupation::Engineer => "Engineer",
            Occupation::Driver => "Driver",
            Occupation::Teacher => "Teacher",
            Occupation::Banker => "Banker",
            Occupation::SalesManager => "Sales Manager",
            Occupation::Businessman => "Businessman",
            Occupation::FactoryWorker => "Factory Worker",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw attributes submitted for an insurance premium prediction
/// # Fields
/// * `age` - Age in years, 0 < age < 120
/// * `weight` - Weight in kilograms
/// * `height` - Height in metres, below 2.5
/// * `income_lpa` - Annual income in lakhs per annum
/// * `smoker` - Whether the person smokes
/// * `city` - City of residence, any casing
/// * `occupation` - One of the fixed occupations
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserInput {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub income_lpa: f64,
    pub smoker: bool,
    pub city: String,
    pub occupation: Occupation,
}

/// Typed response of the premium classifier
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResponse {
    /// The predicted insurance premium category
    pub predicted_category: String,
    /// Probability of the predicted category (0 to 1)
    pub confidence: f64,
    /// Probability distribution across all categories
    pub class_probabilities: BTreeMap<String, f64>,
}

/// Liveness report of the prediction service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
}

/// Request body for admin registration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminCreate {
    pub username: String,
    pub password: String,
}

/// Response to a successful admin registration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminCreated {
    pub message: String,
    pub username: String,
}

/// Form fields of the token endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token handed out on login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Identity carried by a verified token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    pub username: String,
}

/// Patient record as stored
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
}

/// Request body for creating or replacing a patient
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PatientCreate {
    pub name: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
}

impl PatientCreate {
    pub fn into_patient(self, id: RecordId) -> Patient {
        Patient {
            id,
            name: self.name,
            age: self.age,
            weight: self.weight,
            height: self.height,
        }
    }
}

/// Page of patients
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PatientList {
    pub patients: Vec<Patient>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PatientUpdated {
    pub message: String,
    pub patient: Patient,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PatientDeleted {
    pub message: String,
    pub id_deleted: RecordId,
}

/// Doctor record as stored
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub specialty: String,
}

/// Request body for creating or replacing a doctor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DoctorCreate {
    pub name: String,
    pub specialty: String,
}

impl DoctorCreate {
    pub fn into_doctor(self, id: RecordId) -> Doctor {
        Doctor {
            id,
            name: self.name,
            specialty: self.specialty,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DoctorDeleted {
    pub detail: String,
}

/// Plain `{ "message": ... }` body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// Plain `{ "status": ... }` body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusResponse {
    pub status: String,
}
