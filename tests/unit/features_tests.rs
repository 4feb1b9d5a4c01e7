// ============================
// tests/unit/features_tests.rs
// ============================
//! Validation and feature derivation working together
use backend_lib::features::{AgeGroup, DerivedFeatures, FeatureVector, LifestyleRisk};
use backend_lib::validation::{UserAttributes, ValidationError};
use hospital_common::{Occupation, UserInput};

fn input(city: &str) -> UserInput {
    UserInput {
        age: 24,
        weight: 70.0,
        height: 1.75,
        income_lpa: 8.0,
        smoker: false,
        city: city.to_string(),
        occupation: Occupation::Driver,
    }
}

#[test]
fn test_raw_input_to_features() {
    let attrs = UserAttributes::try_from(input(" mumbai ")).unwrap();
    assert_eq!(attrs.city, "Mumbai");

    let derived = DerivedFeatures::from_attributes(&attrs);
    assert!((derived.bmi - 22.857).abs() < 1e-3);
    assert_eq!(derived.age_group, AgeGroup::Young);
    assert_eq!(derived.lifestyle_risk, LifestyleRisk::Low);
    assert_eq!(derived.city_tier, 1);

    let vector = FeatureVector::encode(&derived, attrs.income_lpa, attrs.occupation);
    assert_eq!(vector.get("occupation=Driver"), Some(1.0));
    assert_eq!(vector.get("city_tier=1"), Some(1.0));
    assert_eq!(vector.get("income_lpa"), Some(8.0));
}

#[test]
fn test_unlisted_city_is_tier_three() {
    let attrs = UserAttributes::try_from(input("atlantis")).unwrap();
    assert_eq!(DerivedFeatures::from_attributes(&attrs).city_tier, 3);
}

#[test]
fn test_invalid_input_never_reaches_deriver() {
    let err = UserAttributes::try_from(UserInput {
        height: 2.5,
        ..input("Pune")
    })
    .unwrap_err();
    assert!(matches!(err, ValidationError::OutOfRange { field: "height", .. }));
}

#[test]
fn test_derived_features_serialize_as_wire_names() {
    let attrs = UserAttributes::try_from(UserInput {
        age: 45,
        smoker: true,
        ..input("jaipur")
    })
    .unwrap();
    let json = serde_json::to_value(DerivedFeatures::from_attributes(&attrs)).unwrap();
    assert_eq!(json["age_group"], "middle_aged");
    assert_eq!(json["lifestyle_risk"], "medium");
    assert_eq!(json["city_tier"], 2);
}
