//! Fitted Preprocessing Transforms

use crate::ArtifactError;
use serde::Deserialize;

/// Standardizing scaler fitted at training time.
///
/// Applies `(x - mean) / scale` per column, reproducing the distribution
/// the model saw during training.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Standardize a vector
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if x.len() != self.mean.len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.mean.len(),
                actual: x.len(),
            });
        }

        Ok(x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}

/// Missing-value imputer fitted at training time.
///
/// Replaces non-finite entries with the per-column statistic (e.g. the
/// training-set mean) learned offline.
#[derive(Debug, Clone, Deserialize)]
pub struct Imputer {
    pub statistics: Vec<f64>,
}

impl Imputer {
    /// Fill non-finite entries with the learned column statistics
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if x.len() != self.statistics.len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.statistics.len(),
                actual: x.len(),
            });
        }

        Ok(x.iter()
            .zip(&self.statistics)
            .map(|(value, fill)| if value.is_finite() { *value } else { *fill })
            .collect())
    }
}

/// Ordered feature-name list shipped next to a model trained on a
/// runtime-determined schema
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct FeatureNames(pub Vec<String>);
