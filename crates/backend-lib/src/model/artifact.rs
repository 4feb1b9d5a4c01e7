use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::{Classifier, ClassifierError, RawPrediction};
use crate::features::FeatureVector;

/// On-disk form of a multinomial logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub classes: Vec<String>,
    pub features: Vec<String>,
    /// One row per class, one column per feature
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ModelArtifact {
    fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| Err(ClassifierError::Artifact(msg));

        if self.version.trim().is_empty() {
            return invalid("version is empty".into());
        }
        if self.classes.is_empty() {
            return invalid("no classes".into());
        }
        if self.features.is_empty() {
            return invalid("no features".into());
        }

        let unique: HashSet<&str> = self.classes.iter().map(String::as_str).collect();
        if unique.len() != self.classes.len() {
            return invalid("duplicate class labels".into());
        }
        let unique: HashSet<&str> = self.features.iter().map(String::as_str).collect();
        if unique.len() != self.features.len() {
            return invalid("duplicate feature names".into());
        }

        if self.coefficients.len() != self.classes.len() {
            return invalid(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            ));
        }
        if self.intercepts.len() != self.classes.len() {
            return invalid(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                self.classes.len()
            ));
        }
        for (class, row) in self.classes.iter().zip(&self.coefficients) {
            if row.len() != self.features.len() {
                return invalid(format!(
                    "class `{class}` has {} coefficients for {} features",
                    row.len(),
                    self.features.len()
                ));
            }
        }

        let all_finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(&self.intercepts)
            .all(|w| w.is_finite());
        if !all_finite {
            return invalid("non-finite weight".into());
        }
        Ok(())
    }
}

/// Classifier backed by a [`ModelArtifact`]
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    artifact: ModelArtifact,
}

impl LinearClassifier {
    /// Build a classifier, checking the artifact is self-consistent
    pub fn new(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Read and validate an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    fn input_row(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        self.artifact
            .features
            .iter()
            .map(|name| {
                let value = match features.get(name) {
                    Some(value) => value,
                    // one-hot indicators are sparse
                    None if name.contains('=') => 0.0,
                    None => return Err(ClassifierError::MissingFeature(name.clone())),
                };
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ClassifierError::NonFinite(name.clone()))
                }
            })
            .collect()
    }
}

/// Softmax shifted by the largest logit so `exp` cannot overflow
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Classifier for LinearClassifier {
    fn version(&self) -> &str {
        &self.artifact.version
    }

    fn classify(&self, features: &FeatureVector) -> Result<RawPrediction, ClassifierError> {
        let row = self.input_row(features)?;

        let logits: Vec<f64> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(weights, intercept)| {
                intercept + weights.iter().zip(&row).map(|(w, x)| w * x).sum::<f64>()
            })
            .collect();
        if let Some(i) = logits.iter().position(|l| !l.is_finite()) {
            return Err(ClassifierError::NonFinite(format!(
                "logit for {}",
                self.artifact.classes[i]
            )));
        }

        let probs = softmax(&logits);
        let (best, _) = probs
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, &p)| if p > acc.1 { (i, p) } else { acc });

        Ok(RawPrediction {
            label: self.artifact.classes[best].clone(),
            probabilities: self.artifact.classes.iter().cloned().zip(probs).collect(),
        })
    }
}
