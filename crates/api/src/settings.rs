//! Application Configuration
//!
//! Layered configuration: an optional `riskcast.toml` next to the binary,
//! overridden by `RISKCAST__`-prefixed environment variables (double
//! underscore as the section separator, e.g. `RISKCAST__SERVER__BIND_ADDR`
//! or `RISKCAST__SMTP__PASSWORD`). Artifact locations are resolved here
//! once at startup and injected into the loader; nothing is hard-coded
//! per disease.

use config::{Config, ConfigError, Environment, File};
use feature_vector::Disease;
use model_artifacts::ArtifactPaths;
use notifier::SmtpConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// User database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// Artifact locations per disease
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_diabetes_artifacts")]
    pub diabetes: DiseaseArtifacts,
    #[serde(default = "default_heart_disease_artifacts")]
    pub heart_disease: DiseaseArtifacts,
    #[serde(default = "default_parkinsons_artifacts")]
    pub parkinsons: DiseaseArtifacts,
}

/// Artifact files for a single disease model
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseArtifacts {
    pub model: PathBuf,
    pub scaler: Option<PathBuf>,
    pub imputer: Option<PathBuf>,
    pub feature_names: Option<PathBuf>,
}

impl DiseaseArtifacts {
    fn to_paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths {
            model: self.model.clone(),
            scaler: self.scaler.clone(),
            imputer: None,
            feature_names: None,
        };
        if let Some(imputer) = &self.imputer {
            paths = paths.with_imputer(imputer);
        }
        if let Some(feature_names) = &self.feature_names {
            paths = paths.with_feature_names(feature_names);
        }
        paths
    }
}

impl ArtifactConfig {
    /// Resolved artifact paths for one disease
    pub fn paths_for(&self, disease: Disease) -> ArtifactPaths {
        match disease {
            Disease::Diabetes => self.diabetes.to_paths(),
            Disease::HeartDisease => self.heart_disease.to_paths(),
            Disease::Parkinsons => self.parkinsons.to_paths(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `riskcast.toml` (if present) and the
    /// environment
    pub fn load() -> Result<Self, ConfigError> {
        let settings: AppConfig = Config::builder()
            .add_source(File::with_name("riskcast").required(false))
            .add_source(Environment::with_prefix("RISKCAST").separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Startup validation of cross-field requirements
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifacts.parkinsons.feature_names.is_none() {
            return Err(ConfigError::Message(
                "artifacts.parkinsons.feature_names must be set: the Parkinson's \
                 input schema ships as an artifact next to the model"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            diabetes: default_diabetes_artifacts(),
            heart_disease: default_heart_disease_artifacts(),
            parkinsons: default_parkinsons_artifacts(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite:riskcast.db".to_string()
}

fn default_diabetes_artifacts() -> DiseaseArtifacts {
    DiseaseArtifacts {
        model: "models/diabetes_model.json".into(),
        scaler: Some("models/diabetes_scaler.json".into()),
        imputer: None,
        feature_names: None,
    }
}

fn default_heart_disease_artifacts() -> DiseaseArtifacts {
    DiseaseArtifacts {
        model: "models/heart_disease_model.json".into(),
        scaler: Some("models/heart_disease_scaler.json".into()),
        imputer: Some("models/heart_disease_imputer.json".into()),
        feature_names: None,
    }
}

fn default_parkinsons_artifacts() -> DiseaseArtifacts {
    DiseaseArtifacts {
        model: "models/parkinsons_model.json".into(),
        scaler: Some("models/parkinsons_scaler.json".into()),
        imputer: None,
        feature_names: Some("models/parkinsons_feature_names.json".into()),
    }
}
