// ============================
// crates/backend-lib/src/features.rs
// ============================
//! Derived model features.
//!
//! Pure functions of validated [`UserAttributes`]; nothing here does I/O or
//! re-checks input ranges.
use hospital_common::Occupation;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::validation::UserAttributes;

/// Tier 1 cities, title-cased to match [`normalize_city`]
pub const TIER_1_CITIES: [&str; 7] = [
    "Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata", "Hyderabad", "Pune",
];

/// Tier 2 cities, title-cased to match [`normalize_city`]
pub const TIER_2_CITIES: [&str; 48] = [
    "Jaipur", "Chandigarh", "Indore", "Lucknow", "Patna", "Ranchi", "Visakhapatnam",
    "Coimbatore", "Bhopal", "Nagpur", "Vadodara", "Surat", "Rajkot", "Jodhpur", "Raipur",
    "Amritsar", "Varanasi", "Agra", "Dehradun", "Mysore", "Jabalpur", "Guwahati",
    "Thiruvananthapuram", "Ludhiana", "Nashik", "Allahabad", "Udaipur", "Aurangabad", "Hubli",
    "Belgaum", "Salem", "Vijayawada", "Tiruchirappalli", "Bhavnagar", "Gwalior", "Dhanbad",
    "Bareilly", "Aligarh", "Gaya", "Kozhikode", "Warangal", "Kolhapur", "Bilaspur", "Jalandhar",
    "Noida", "Guntur", "Asansol", "Siliguri",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Young,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Young => "young",
            AgeGroup::Adult => "adult",
            AgeGroup::MiddleAged => "middle_aged",
            AgeGroup::Senior => "senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifestyleRisk {
    Low,
    Medium,
    High,
}

impl LifestyleRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifestyleRisk::Low => "low",
            LifestyleRisk::Medium => "medium",
            LifestyleRisk::High => "high",
        }
    }
}

impl fmt::Display for LifestyleRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model inputs computed from the raw attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFeatures {
    pub bmi: f64,
    pub age_group: AgeGroup,
    pub lifestyle_risk: LifestyleRisk,
    /// 1, 2 or 3
    pub city_tier: u8,
}

impl DerivedFeatures {
    pub fn from_attributes(attrs: &UserAttributes) -> Self {
        let bmi = bmi(attrs.weight, attrs.height);
        Self {
            bmi,
            age_group: age_group(attrs.age),
            lifestyle_risk: lifestyle_risk(attrs.smoker, bmi),
            city_tier: city_tier(&attrs.city),
        }
    }
}

/// Body-mass index. `height` is in metres and already known to be positive.
pub fn bmi(weight: f64, height: f64) -> f64 {
    weight / (height * height)
}

/// Half-open, lower-inclusive age buckets
pub fn age_group(age: i32) -> AgeGroup {
    if age < 25 {
        AgeGroup::Young
    } else if age < 45 {
        AgeGroup::Adult
    } else if age < 60 {
        AgeGroup::MiddleAged
    } else {
        AgeGroup::Senior
    }
}

pub fn lifestyle_risk(smoker: bool, bmi: f64) -> LifestyleRisk {
    // the conjunction must be tested before either half can yield Medium
    if smoker && bmi > 30.0 {
        LifestyleRisk::High
    } else if smoker || bmi > 27.0 {
        LifestyleRisk::Medium
    } else {
        LifestyleRisk::Low
    }
}

/// Tier of an already normalized city name; anything unlisted is tier 3
pub fn city_tier(city: &str) -> u8 {
    if TIER_1_CITIES.contains(&city) {
        1
    } else if TIER_2_CITIES.contains(&city) {
        2
    } else {
        3
    }
}

/// Trim, then title-case: a letter following a non-letter is upper-cased,
/// every other letter lower-cased.
pub fn normalize_city(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut in_word = false;
    for c in trimmed.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Named numeric inputs handed to the classifier.
///
/// Holds `bmi` and `income_lpa` as-is plus one-hot indicators named
/// `<feature>=<value>` for the categorical inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn encode(derived: &DerivedFeatures, income_lpa: f64, occupation: Occupation) -> Self {
        let mut vector = Self::default();
        vector.set("bmi", derived.bmi);
        vector.set("income_lpa", income_lpa);
        vector.set(format!("age_group={}", derived.age_group), 1.0);
        vector.set(format!("lifestyle_risk={}", derived.lifestyle_risk), 1.0);
        vector.set(format!("occupation={occupation}"), 1.0);
        vector.set(format!("city_tier={}", derived.city_tier), 1.0);
        vector
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
