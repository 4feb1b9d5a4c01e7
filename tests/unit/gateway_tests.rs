// ===========================
// tests/unit/gateway_tests.rs
// ===========================
//! Prediction gateway over the shipped model artifact
use backend_lib::error::AppError;
use backend_lib::model::{Classifier, PROBABILITY_TOLERANCE};
use backend_lib::model::{LinearClassifier, PredictionGateway};
use backend_lib::validation::UserAttributes;
use hospital_common::{Occupation, UserInput};

use crate::test_utils::{shipped_gateway, workspace_file};

fn attrs(age: i32, weight: f64, smoker: bool, city: &str) -> UserAttributes {
    UserAttributes::try_from(UserInput {
        age,
        weight,
        height: 1.7,
        income_lpa: 15.0,
        smoker,
        city: city.to_string(),
        occupation: Occupation::Banker,
    })
    .unwrap()
}

#[test]
fn test_shipped_artifact_metadata() {
    let classifier = LinearClassifier::load(workspace_file("model/insurance_premium.json")).unwrap();
    assert_eq!(classifier.version(), "1.0.0");
    assert_eq!(classifier.classes(), ["High", "Low", "Medium"]);
}

#[test]
fn test_predictions_are_well_formed() {
    let gateway = shipped_gateway();
    for a in [
        attrs(22, 60.0, false, "Shimla"),
        attrs(40, 85.0, true, "Indore"),
        attrs(70, 100.0, true, "Mumbai"),
    ] {
        let response = gateway.predict_attributes(&a).unwrap();
        let sum: f64 = response.class_probabilities.values().sum();
        assert!((sum - 1.0).abs() < PROBABILITY_TOLERANCE);
        assert_eq!(
            response.class_probabilities[&response.predicted_category],
            response.confidence
        );
        assert!(response
            .class_probabilities
            .values()
            .all(|p| (0.0..=1.0).contains(p)));
    }
}

#[test]
fn test_risk_moves_the_prediction() {
    let gateway = shipped_gateway();
    let low = gateway
        .predict_attributes(&attrs(22, 60.0, false, "Shimla"))
        .unwrap();
    let high = gateway
        .predict_attributes(&attrs(70, 100.0, true, "Mumbai"))
        .unwrap();

    assert_eq!(low.predicted_category, "Low");
    assert_eq!(high.predicted_category, "High");
}

#[test]
fn test_not_loaded_gateway() {
    let gateway = PredictionGateway::not_loaded();
    let health = gateway.health_check();
    assert!(!health.model_loaded);

    let err = gateway
        .predict_attributes(&attrs(30, 70.0, false, "Pune"))
        .unwrap_err();
    assert!(matches!(err, AppError::Model(msg) if msg == "model not loaded"));
}
