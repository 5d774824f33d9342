//! Feature Schema Definitions
//!
//! A schema is the ordered, named list of numeric inputs a trained model
//! expects. Field order is part of the trained artifact's contract: the
//! vector handed to the model must match it exactly, so the fixed schemas
//! below must stay in lockstep with the training pipeline that produced
//! the deployed artifacts.

use crate::Disease;

/// Diabetes model inputs, in training order
pub const DIABETES_FEATURES: &[&str] = &[
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree_function",
    "age",
];

/// Heart disease model inputs, in training order
pub const HEART_DISEASE_FEATURES: &[&str] = &[
    "age",
    "sex",
    "chest_pain_type",
    "resting_bp",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_induced_angina",
    "st_depression",
    "st_slope",
    "major_vessels_blocked",
    "thalassemia_result",
];

/// Ordered, named input schema for one disease model
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSchema {
    /// Compile-time schema (diabetes, heart disease)
    Fixed(&'static [&'static str]),
    /// Schema loaded from the feature-name artifact at runtime (Parkinson's)
    Dynamic(Vec<String>),
}

impl FeatureSchema {
    /// Fixed schema for a disease, or `None` when the field list ships as
    /// an artifact next to the model
    pub fn fixed_for(disease: Disease) -> Option<Self> {
        match disease {
            Disease::Diabetes => Some(FeatureSchema::Fixed(DIABETES_FEATURES)),
            Disease::HeartDisease => Some(FeatureSchema::Fixed(HEART_DISEASE_FEATURES)),
            Disease::Parkinsons => None,
        }
    }

    /// Build a schema from a runtime-loaded feature-name list
    pub fn dynamic(names: Vec<String>) -> Self {
        FeatureSchema::Dynamic(names)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        match self {
            FeatureSchema::Fixed(fields) => fields.len(),
            FeatureSchema::Dynamic(fields) => fields.len(),
        }
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field name at position `idx`
    pub fn name(&self, idx: usize) -> &str {
        match self {
            FeatureSchema::Fixed(fields) => fields[idx],
            FeatureSchema::Dynamic(fields) => &fields[idx],
        }
    }

    /// Field names in schema order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).map(move |idx| self.name(idx))
    }
}
