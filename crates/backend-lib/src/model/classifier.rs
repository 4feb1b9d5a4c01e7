use thiserror::Error;

use crate::features::FeatureVector;

/// Failures raised by a classifier implementation
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("missing feature `{0}`")]
    MissingFeature(String),

    #[error("feature `{0}` is not a finite number")]
    NonFinite(String),

    #[error("invalid model artifact: {0}")]
    Artifact(String),

    #[error("could not read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse model artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unshaped classifier output: a label and the full distribution.
///
/// Nothing about it is trusted until the gateway has checked it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub label: String,
    pub probabilities: Vec<(String, f64)>,
}

/// A trained premium-category classifier.
///
/// Implementations are immutable after construction and shared across
/// request tasks.
pub trait Classifier: Send + Sync {
    /// Version string of the loaded model, reported by health checks
    fn version(&self) -> &str;

    /// Classify one feature vector
    ///
    /// # Errors
    /// Returns a `ClassifierError` when the vector lacks a feature the model
    /// needs or carries a non-finite value.
    fn classify(&self, features: &FeatureVector) -> Result<RawPrediction, ClassifierError>;
}
