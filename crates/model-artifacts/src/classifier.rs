//! Trained Binary Classifiers
//!
//! The training pipeline exports fitted models as JSON: either logistic
//! regression coefficients or a k-nearest-neighbors table. Class 1 is the
//! positive (at-risk) class throughout.

use crate::ArtifactError;
use serde::Deserialize;
use std::cmp::Ordering;

/// A trained binary classifier, deserialized from a model artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    KNearestNeighbors {
        n_neighbors: usize,
        points: Vec<Vec<f64>>,
        labels: Vec<u8>,
    },
}

impl Classifier {
    /// Input dimensionality the model was trained on
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression { coefficients, .. } => coefficients.len(),
            Classifier::KNearestNeighbors { points, .. } => {
                points.first().map(Vec::len).unwrap_or(0)
            }
        }
    }

    /// Predicted class label for a feature vector
    pub fn predict(&self, x: &[f64]) -> Result<u8, ArtifactError> {
        let proba = self.predict_proba(x)?;
        Ok(if proba[1] > proba[0] { 1 } else { 0 })
    }

    /// Probability distribution over the two classes, summing to 1
    pub fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], ArtifactError> {
        if x.len() != self.n_features() {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.n_features(),
                actual: x.len(),
            });
        }

        match self {
            Classifier::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let score: f64 = coefficients
                    .iter()
                    .zip(x)
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
                    + intercept;
                let p1 = sigmoid(score);
                Ok([1.0 - p1, p1])
            }
            Classifier::KNearestNeighbors {
                n_neighbors,
                points,
                labels,
            } => {
                let mut neighbors: Vec<(f64, u8)> = points
                    .iter()
                    .zip(labels)
                    .map(|(point, label)| (squared_distance(point, x), *label))
                    .collect();
                neighbors
                    .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

                let k = (*n_neighbors).min(neighbors.len()).max(1);
                let positives = neighbors
                    .iter()
                    .take(k)
                    .filter(|(_, label)| *label == 1)
                    .count();

                let p1 = positives as f64 / k as f64;
                Ok([1.0 - p1, p1])
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
