//! Artifact Resolution and Loading

use crate::{ArtifactError, Classifier, FeatureNames, Imputer, Scaler};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File locations for one disease's artifacts, supplied by configuration
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: Option<PathBuf>,
    pub imputer: Option<PathBuf>,
    pub feature_names: Option<PathBuf>,
}

/// The loaded artifacts for one disease, read-only after loading
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub classifier: Classifier,
    pub scaler: Option<Scaler>,
    pub imputer: Option<Imputer>,
    pub feature_names: Option<FeatureNames>,
}

impl ArtifactPaths {
    /// Paths for a disease that ships only a model and a scaler
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: Some(scaler.into()),
            imputer: None,
            feature_names: None,
        }
    }

    /// Add an imputer artifact
    pub fn with_imputer(mut self, path: impl Into<PathBuf>) -> Self {
        self.imputer = Some(path.into());
        self
    }

    /// Add a feature-name artifact
    pub fn with_feature_names(mut self, path: impl Into<PathBuf>) -> Self {
        self.feature_names = Some(path.into());
        self
    }

    /// Every configured path; all of them are required once configured
    fn required(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.model.as_path())
            .chain(self.scaler.as_deref())
            .chain(self.imputer.as_deref())
            .chain(self.feature_names.as_deref())
    }

    /// Load and deserialize every configured artifact.
    ///
    /// Existence of every required file is verified before any of them is
    /// deserialized; the first absent path aborts the load with no partial
    /// reads. A file that exists but cannot be decoded reports the
    /// underlying error text. The loaded objects are not inspected beyond
    /// decode success; the training-time contract is trusted.
    pub fn load(&self) -> Result<ArtifactBundle, ArtifactError> {
        for path in self.required() {
            if !path.exists() {
                return Err(ArtifactError::Missing {
                    path: path.to_path_buf(),
                });
            }
        }

        let classifier: Classifier = read_json(&self.model)?;
        let scaler = self.scaler.as_deref().map(read_json::<Scaler>).transpose()?;
        let imputer = self
            .imputer
            .as_deref()
            .map(read_json::<Imputer>)
            .transpose()?;
        let feature_names = self
            .feature_names
            .as_deref()
            .map(read_json::<FeatureNames>)
            .transpose()?;

        info!(model = %self.model.display(), "loaded artifact bundle");
        Ok(ArtifactBundle {
            classifier,
            scaler,
            imputer,
            feature_names,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    debug!(path = %path.display(), "reading artifact");
    let bytes = fs::read(path).map_err(|err| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}
