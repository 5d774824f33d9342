//! Prediction Route

use crate::{ApiError, SharedState};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use feature_vector::{Disease, FeatureSchema, Vectorizer};
use prediction_pipeline::{assess, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Prediction request: the named form fields for one disease
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub fields: HashMap<String, f64>,
}

/// Prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub disease: Disease,
    pub predicted_class: u8,
    pub risk_label: &'static str,
    pub severity: Severity,
    pub confidence_percent: f64,
    /// Percent probability per class, index 1 is the at-risk class
    pub class_probabilities: [f64; 2],
    pub guidance: &'static str,
}

/// Run one risk prediction for the authenticated caller
pub async fn predict(
    State(state): State<SharedState>,
    Path(disease): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let kind: Disease = disease
        .parse()
        .map_err(|_| ApiError::UnknownDisease(disease))?;
    let username = state.sessions.authorize(&headers).await?;

    let paths = state.settings.artifacts.paths_for(kind);
    let bundle = state.artifacts.get_or_load(kind, &paths).await?;

    let schema = match FeatureSchema::fixed_for(kind) {
        Some(schema) => schema,
        None => {
            let names = bundle.feature_names.as_ref().ok_or_else(|| {
                ApiError::Internal(format!("no feature-name artifact configured for {kind}"))
            })?;
            FeatureSchema::dynamic(names.0.clone())
        }
    };

    let vector = Vectorizer::new(&schema).vectorize(&body.fields)?;
    let prediction = prediction_pipeline::run(&bundle, vector)?;
    let assessment = assess(kind, &prediction);

    info!(
        user = %username,
        disease = %kind,
        class = prediction.predicted_class,
        confidence = prediction.confidence_percent,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        disease: kind,
        predicted_class: prediction.predicted_class,
        risk_label: assessment.risk_label,
        severity: assessment.severity,
        confidence_percent: prediction.confidence_percent,
        class_probabilities: prediction.class_probabilities,
        guidance: assessment.guidance,
    }))
}
