//! Model Artifact Loading
//!
//! Deserializes trained classifiers and their companion preprocessing
//! transforms (scaler, imputer, feature-name list) from disk, and caches
//! the loaded bundles for the lifetime of the process. Artifacts are
//! produced by the offline training step and consumed read-only here.

mod cache;
mod classifier;
mod loader;
mod transform;

pub use cache::ArtifactCache;
pub use classifier::Classifier;
pub use loader::{ArtifactBundle, ArtifactPaths};
pub use transform::{FeatureNames, Imputer, Scaler};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or evaluating artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// A required artifact file is absent
    #[error("missing artifact: {path}")]
    Missing { path: PathBuf },

    /// An artifact file exists but could not be read or decoded
    #[error("corrupt or incompatible artifact {path}: {detail}")]
    Corrupt { path: PathBuf, detail: String },

    /// A vector's dimensionality disagrees with the trained artifact
    #[error("input has {actual} features, artifact expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}
