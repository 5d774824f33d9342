//! Process-Lifetime Bundle Cache

use crate::{ArtifactBundle, ArtifactError, ArtifactPaths};
use feature_vector::Disease;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Read-only cache of loaded artifact bundles, keyed by disease.
///
/// Artifacts never change without a redeploy, so a bundle loaded once is
/// reused for the life of the process. Failed loads are not cached: a
/// request after the operator repairs an artifact succeeds without a
/// restart.
#[derive(Default)]
pub struct ArtifactCache {
    bundles: RwLock<HashMap<Disease, Arc<ArtifactBundle>>>,
}

impl ArtifactCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached bundle for `disease`, loading it from `paths` on
    /// first use
    pub async fn get_or_load(
        &self,
        disease: Disease,
        paths: &ArtifactPaths,
    ) -> Result<Arc<ArtifactBundle>, ArtifactError> {
        if let Some(bundle) = self.bundles.read().await.get(&disease) {
            debug!(%disease, "artifact cache hit");
            return Ok(Arc::clone(bundle));
        }

        let bundle = Arc::new(paths.load()?);

        let mut bundles = self.bundles.write().await;
        let entry = bundles
            .entry(disease)
            .or_insert_with(|| Arc::clone(&bundle));
        Ok(Arc::clone(entry))
    }

    /// Number of cached bundles
    pub async fn len(&self) -> usize {
        self.bundles.read().await.len()
    }

    /// Whether the cache holds no bundles
    pub async fn is_empty(&self) -> bool {
        self.bundles.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> ArtifactPaths {
        let model = dir.path().join("model.json");
        let scaler = dir.path().join("scaler.json");
        fs::write(
            &model,
            r#"{"kind":"logistic_regression","coefficients":[1.0],"intercept":0.0}"#,
        )
        .unwrap();
        fs::write(&scaler, r#"{"mean":[0.0],"scale":[1.0]}"#).unwrap();
        ArtifactPaths::new(model, scaler)
    }

    #[tokio::test]
    async fn test_bundle_cached_after_first_load() {
        let dir = TempDir::new().unwrap();
        let cache = ArtifactCache::new();
        let paths = paths(&dir);

        let first = cache.get_or_load(Disease::Diabetes, &paths).await.unwrap();
        let second = cache.get_or_load(Disease::Diabetes, &paths).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_load_not_cached() {
        let dir = TempDir::new().unwrap();
        let cache = ArtifactCache::new();
        let missing = ArtifactPaths::new(dir.path().join("none.json"), dir.path().join("no.json"));

        assert!(cache.get_or_load(Disease::Diabetes, &missing).await.is_err());
        assert!(cache.is_empty().await);

        // A repaired artifact set loads on the next request.
        let good = paths(&dir);
        assert!(cache.get_or_load(Disease::Diabetes, &good).await.is_ok());
    }
}
