//! Prediction Pipeline
//!
//! One generic pipeline serves all three diseases: apply the fitted
//! imputer and scaler when the bundle carries them, then the classifier's
//! predict and predict_proba. Pure and stateless; identical artifacts and
//! input always produce identical results.

mod assessment;
mod pipeline;

pub use assessment::{assess, Assessment, Severity};
pub use pipeline::{run, Prediction};

use feature_vector::VectorError;
use model_artifacts::ArtifactError;
use thiserror::Error;

/// Errors from the prediction pipeline
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Artifact loading or evaluation failed
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The assembled vector disagrees with a transform or the model on
    /// dimensionality; the vectorizer and the loaded artifacts have
    /// drifted apart
    #[error("{stage} expects {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// User input failed domain validation
    #[error(transparent)]
    InvalidInput(#[from] VectorError),
}
