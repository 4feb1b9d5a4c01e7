use hospital_common::{HealthStatus, Occupation, PredictionResponse};
use metrics::counter;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Classifier, RawPrediction};
use crate::error::AppError;
use crate::features::{DerivedFeatures, FeatureVector};
use crate::metrics::{PREDICTION_FAILURE, PREDICTION_SUCCESS};
use crate::validation::UserAttributes;

/// Allowed distance between the sum of a distribution and 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

const NOT_LOADED_VERSION: &str = "unavailable";

/// Front door to the premium classifier.
///
/// Whether a model is loaded is decided once, at construction.
#[derive(Clone)]
pub struct PredictionGateway {
    classifier: Option<Arc<dyn Classifier>>,
}

impl PredictionGateway {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    /// A gateway whose every prediction fails with `model not loaded`
    pub fn not_loaded() -> Self {
        Self { classifier: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn version(&self) -> &str {
        self.classifier
            .as_deref()
            .map_or(NOT_LOADED_VERSION, |c| c.version())
    }

    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            status: "OK".to_string(),
            version: self.version().to_string(),
            model_loaded: self.is_loaded(),
        }
    }

    /// Derive features for validated attributes and predict
    pub fn predict_attributes(&self, attrs: &UserAttributes) -> Result<PredictionResponse, AppError> {
        let derived = DerivedFeatures::from_attributes(attrs);
        tracing::debug!(?derived, "derived features");
        self.predict(&derived, attrs.income_lpa, attrs.occupation)
    }

    /// Run the classifier and shape its output.
    ///
    /// Every failure, including a malformed distribution, becomes
    /// `AppError::Model`.
    #[tracing::instrument(skip(self, derived))]
    pub fn predict(
        &self,
        derived: &DerivedFeatures,
        income_lpa: f64,
        occupation: Occupation,
    ) -> Result<PredictionResponse, AppError> {
        let result = self.classify(derived, income_lpa, occupation);
        match &result {
            Ok(response) => {
                counter!(PREDICTION_SUCCESS).increment(1);
                tracing::info!(category = %response.predicted_category, "prediction served");
            }
            Err(err) => {
                counter!(PREDICTION_FAILURE).increment(1);
                tracing::warn!(error = %err, "prediction failed");
            }
        }
        result
    }

    fn classify(
        &self,
        derived: &DerivedFeatures,
        income_lpa: f64,
        occupation: Occupation,
    ) -> Result<PredictionResponse, AppError> {
        let classifier = self
            .classifier
            .as_deref()
            .ok_or_else(|| AppError::Model("model not loaded".to_string()))?;

        let features = FeatureVector::encode(derived, income_lpa, occupation);
        let raw = classifier
            .classify(&features)
            .map_err(|e| AppError::Model(e.to_string()))?;
        shape(raw)
    }
}

fn shape(raw: RawPrediction) -> Result<PredictionResponse, AppError> {
    let malformed = |msg: String| AppError::Model(format!("malformed classifier output: {msg}"));

    let mut class_probabilities = BTreeMap::new();
    for (label, p) in raw.probabilities {
        if !(0.0..=1.0).contains(&p) {
            return Err(malformed(format!("probability {p} for `{label}` outside [0, 1]")));
        }
        if class_probabilities.insert(label.clone(), p).is_some() {
            return Err(malformed(format!("duplicate class `{label}`")));
        }
    }

    let sum: f64 = class_probabilities.values().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(malformed(format!("probabilities sum to {sum}")));
    }

    let confidence = *class_probabilities
        .get(&raw.label)
        .ok_or_else(|| malformed(format!("label `{}` not in distribution", raw.label)))?;

    Ok(PredictionResponse {
        predicted_category: raw.label,
        confidence,
        class_probabilities,
    })
}
