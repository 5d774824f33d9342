//! Risk Assessment Presentation
//!
//! Turns a raw prediction into user-facing text: a label, a binary
//! severity tag, and one of two fixed guidance templates per disease.

use crate::Prediction;
use feature_vector::Disease;
use serde::Serialize;

/// Binary severity tag for a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Elevated,
}

impl Severity {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Elevated => "elevated",
        }
    }
}

/// User-facing interpretation of a prediction
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub disease: Disease,
    pub risk_label: &'static str,
    pub severity: Severity,
    pub guidance: &'static str,
}

/// Interpret a prediction for display. A single binary branch on the
/// predicted class; no other logic.
pub fn assess(disease: Disease, prediction: &Prediction) -> Assessment {
    let at_risk = prediction.predicted_class == 1;

    let risk_label = match (disease, at_risk) {
        (Disease::Diabetes, true) => "Diabetic",
        (Disease::Diabetes, false) => "Not Diabetic",
        (Disease::HeartDisease, true) => "High Risk (Heart Disease)",
        (Disease::HeartDisease, false) => "Low Risk (No Heart Disease)",
        (Disease::Parkinsons, true) => "Parkinson's Disease",
        (Disease::Parkinsons, false) => "Healthy",
    };

    let guidance = match (disease, at_risk) {
        (Disease::Diabetes, true) => "High risk of diabetes. Please consult a doctor.",
        (Disease::HeartDisease, true) => {
            "High risk of heart disease. Please consult a cardiologist."
        }
        (Disease::Parkinsons, true) => {
            "High risk of Parkinson's disease. Please consult a neurologist."
        }
        (Disease::Diabetes, false) => "Low risk of diabetes. Maintain a healthy lifestyle.",
        (Disease::HeartDisease, false) => {
            "Low risk of heart disease. Maintain a healthy lifestyle."
        }
        (Disease::Parkinsons, false) => {
            "Low risk of Parkinson's disease. Maintain a healthy lifestyle."
        }
    };

    Assessment {
        disease,
        risk_label,
        severity: if at_risk {
            Severity::Elevated
        } else {
            Severity::Low
        },
        guidance,
    }
}
