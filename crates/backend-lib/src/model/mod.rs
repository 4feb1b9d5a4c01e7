// ============================
// crates/backend-lib/src/model/mod.rs
// ============================
//! Premium classifier port, the JSON artifact adapter behind it and the
//! gateway that turns classifier output into API responses.

mod artifact;
mod classifier;
mod gateway;

pub use artifact::{LinearClassifier, ModelArtifact};
pub use classifier::{Classifier, ClassifierError, RawPrediction};
pub use gateway::{PredictionGateway, PROBABILITY_TOLERANCE};
