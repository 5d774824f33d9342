//! Disease Listing Route

use crate::{ApiError, SharedState};
use axum::extract::State;
use axum::Json;
use feature_vector::{Disease, FeatureSchema};
use serde::Serialize;

/// One disease with its ordered input schema
#[derive(Debug, Serialize)]
pub struct DiseaseSchema {
    pub disease: Disease,
    pub title: &'static str,
    pub fields: Vec<String>,
}

/// List the supported diseases and the fields each model expects.
///
/// Clients render their input forms from this, so the Parkinson's entry
/// reflects whatever feature list the deployed artifact was trained on.
pub async fn list(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DiseaseSchema>>, ApiError> {
    let mut out = Vec::with_capacity(Disease::ALL.len());

    for disease in Disease::ALL {
        let fields = match FeatureSchema::fixed_for(disease) {
            Some(schema) => schema.names().map(str::to_string).collect(),
            None => {
                let paths = state.settings.artifacts.paths_for(disease);
                let bundle = state.artifacts.get_or_load(disease, &paths).await?;
                let names = bundle.feature_names.as_ref().ok_or_else(|| {
                    ApiError::Internal(format!(
                        "no feature-name artifact configured for {disease}"
                    ))
                })?;
                names.0.clone()
            }
        };

        out.push(DiseaseSchema {
            disease,
            title: disease.title(),
            fields,
        });
    }

    Ok(Json(out))
}
