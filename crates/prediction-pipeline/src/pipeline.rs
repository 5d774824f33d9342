//! Pipeline Execution

use crate::PredictionError;
use model_artifacts::{ArtifactBundle, ArtifactError};
use serde::Serialize;
use tracing::debug;

/// Result of running a risk model over one input vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted class: 1 is the at-risk class
    pub predicted_class: u8,
    /// Probability of the predicted class, as a percentage
    pub confidence_percent: f64,
    /// Probabilities for classes 0 and 1, as percentages summing to 100
    pub class_probabilities: [f64; 2],
}

/// Run the pipeline: imputer, then scaler, then the classifier.
///
/// Each step is applied only when the bundle carries the corresponding
/// artifact. A dimensionality disagreement at any stage is reported as a
/// shape mismatch naming that stage rather than an opaque failure.
pub fn run(bundle: &ArtifactBundle, values: Vec<f64>) -> Result<Prediction, PredictionError> {
    let values = match &bundle.imputer {
        Some(imputer) => imputer.transform(&values).map_err(at_stage("imputer"))?,
        None => values,
    };

    let values = match &bundle.scaler {
        Some(scaler) => scaler.transform(&values).map_err(at_stage("scaler"))?,
        None => values,
    };

    let predicted_class = bundle
        .classifier
        .predict(&values)
        .map_err(at_stage("classifier"))?;
    let proba = bundle
        .classifier
        .predict_proba(&values)
        .map_err(at_stage("classifier"))?;

    let prediction = Prediction {
        predicted_class,
        confidence_percent: proba[predicted_class as usize] * 100.0,
        class_probabilities: [proba[0] * 100.0, proba[1] * 100.0],
    };

    debug!(
        class = prediction.predicted_class,
        confidence = prediction.confidence_percent,
        "pipeline complete"
    );
    Ok(prediction)
}

fn at_stage(stage: &'static str) -> impl Fn(ArtifactError) -> PredictionError {
    move |err| match err {
        ArtifactError::ShapeMismatch { expected, actual } => PredictionError::ShapeMismatch {
            stage,
            expected,
            actual,
        },
        other => PredictionError::Artifact(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_artifacts::{Classifier, Imputer, Scaler};

    fn bundle() -> ArtifactBundle {
        ArtifactBundle {
            classifier: Classifier::LogisticRegression {
                coefficients: vec![1.0, 1.0],
                intercept: -1.0,
            },
            scaler: Some(Scaler {
                mean: vec![10.0, 10.0],
                scale: vec![2.0, 2.0],
            }),
            imputer: Some(Imputer {
                statistics: vec![10.0, 10.0],
            }),
            feature_names: None,
        }
    }

    #[test]
    fn test_chain_applies_imputer_then_scaler() {
        // NaN imputes to 10.0, both scale to 0.0, score = -1.0.
        let prediction = run(&bundle(), vec![f64::NAN, 10.0]).unwrap();
        assert_eq!(prediction.predicted_class, 0);
        assert!(prediction.confidence_percent > 50.0);
        assert!(
            (prediction.class_probabilities[0] + prediction.class_probabilities[1] - 100.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_confidence_tracks_predicted_class() {
        let prediction = run(&bundle(), vec![20.0, 20.0]).unwrap();
        assert_eq!(prediction.predicted_class, 1);
        assert_eq!(
            prediction.confidence_percent,
            prediction.class_probabilities[1]
        );
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let input = vec![12.0, 9.0];
        let first = run(&bundle(), input.clone()).unwrap();
        let second = run(&bundle(), input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_mismatch_names_the_stage() {
        let err = run(&bundle(), vec![1.0]).unwrap_err();
        match err {
            PredictionError::ShapeMismatch {
                stage,
                expected,
                actual,
            } => {
                assert_eq!(stage, "imputer");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_transforms_optional() {
        let bare = ArtifactBundle {
            classifier: Classifier::LogisticRegression {
                coefficients: vec![1.0],
                intercept: 0.0,
            },
            scaler: None,
            imputer: None,
            feature_names: None,
        };

        let prediction = run(&bare, vec![3.0]).unwrap();
        assert_eq!(prediction.predicted_class, 1);
    }
}
