//! API Error Mapping
//!
//! Every failure from the pipeline or the stores is converted to a
//! structured JSON response at this boundary; nothing crashes the process
//! and nothing is retried (the failures are deterministic).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_vector::VectorError;
use model_artifacts::ArtifactError;
use prediction_pipeline::PredictionError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use user_store::UserStoreError;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown disease: {0}")]
    UnknownDisease(String),

    #[error("missing or invalid session token")]
    Unauthorized,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Input(#[from] VectorError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Users(#[from] UserStoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UnknownDisease(_) => (StatusCode::UNPROCESSABLE_ENTITY, "unknown_disease"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Artifact(err) => artifact_status(err),
            ApiError::Input(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
            ApiError::Prediction(err) => match err {
                PredictionError::Artifact(inner) => artifact_status(inner),
                PredictionError::ShapeMismatch { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "schema_mismatch")
                }
                PredictionError::InvalidInput(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
                }
            },
            ApiError::Users(err) => match err {
                UserStoreError::DuplicateUser => (StatusCode::CONFLICT, "duplicate_user"),
                UserStoreError::AuthFailure => (StatusCode::UNAUTHORIZED, "auth_failure"),
                UserStoreError::InvalidField { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_field")
                }
                UserStoreError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

fn artifact_status(err: &ArtifactError) -> (StatusCode, &'static str) {
    match err {
        ArtifactError::Missing { .. } => (StatusCode::SERVICE_UNAVAILABLE, "missing_artifact"),
        ArtifactError::Corrupt { .. } => (StatusCode::SERVICE_UNAVAILABLE, "corrupt_artifact"),
        ArtifactError::ShapeMismatch { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "schema_mismatch")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let detail = self.to_string();

        if status.is_server_error() {
            // Schema mismatch means the vectorizer and the deployed
            // artifacts disagree; that needs an operator, not a retry.
            error!(kind, %detail, "request failed");
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(kind, %detail, "artifact unavailable");
        }

        let body = Json(json!({ "error": kind, "detail": detail }));
        (status, body).into_response()
    }
}
