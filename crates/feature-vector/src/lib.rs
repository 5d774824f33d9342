//! Feature Schemas and Vectorization
//!
//! Maps named user-supplied values into the fixed-order numeric vectors
//! the trained disease models expect.

mod disease;
mod schema;
mod vectorizer;

pub use disease::{Disease, UnknownDisease};
pub use schema::{FeatureSchema, DIABETES_FEATURES, HEART_DISEASE_FEATURES};
pub use vectorizer::Vectorizer;

use thiserror::Error;

/// Errors during input vectorization
#[derive(Debug, Clone, Error, PartialEq)]
pub enum VectorError {
    /// A schema field was not supplied
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A supplied value was negative
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue { field: String, value: f64 },

    /// Every supplied value was exactly zero
    #[error("all fields are zero; enter at least one non-zero value")]
    AllZero,
}
