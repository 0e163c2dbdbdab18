//! Prediction service - process-wide model state
//!
//! Loaded once at startup and shared read-only by every request.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::Serialize;

use super::{
    Classifier, LinearExplainer, LogisticRegression, ModelArtifact, ModelError, Pipeline,
    TabularRow, Transformer,
};
use crate::models::PatientRecord;

/// Metadata about the loaded artifact
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub model_path: String,
    pub loaded_at: DateTime<Utc>,
    pub classes: Vec<i64>,
}

/// Class decision for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: i64,
    /// Probability of the positive (second) class
    pub probability: f64,
}

/// Named attributions for one row, in transformer output order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureAttributions {
    pub attributions: Vec<(String, f64)>,
    pub base_value: f64,
}

#[derive(Debug)]
pub struct PredictionService {
    pipeline: Pipeline,
    explainer: LinearExplainer,
    background: Array2<f64>,
    feature_names: Vec<String>,
    metadata: ModelMetadata,
}

impl PredictionService {
    /// Load the artifact and build every derived handle
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        tracing::info!("Loading model artifact from: {}", path.display());

        let artifact = ModelArtifact::load(path)?;
        Self::from_artifact(artifact, &path.display().to_string())
    }

    pub fn from_artifact(artifact: ModelArtifact, model_path: &str) -> Result<Self, ModelError> {
        let name = artifact.name.clone().unwrap_or_else(|| "unnamed".to_string());
        let pipeline = artifact.into_pipeline()?;

        let background = build_background(&pipeline)?;
        let classifier: &LogisticRegression = pipeline.classifier();
        let explainer = LinearExplainer::new(classifier, &background)?;
        let feature_names = pipeline.preprocessor().feature_names_out();

        tracing::info!(
            "Model '{}' ready: {} features, base value {:.4}",
            name,
            feature_names.len(),
            explainer.expected_value()
        );

        let metadata = ModelMetadata {
            name,
            model_path: model_path.to_string(),
            loaded_at: Utc::now(),
            classes: pipeline.classifier().classes().to_vec(),
        };

        Ok(Self {
            pipeline,
            explainer,
            background,
            feature_names,
            metadata,
        })
    }

    pub fn predict(&self, row: &TabularRow) -> Result<Prediction, ModelError> {
        let label = self.pipeline.predict(row)?;
        let probability = self.pipeline.predict_proba(row)?[1];

        Ok(Prediction { label, probability })
    }

    /// Attributions on the preprocessor output, against the zero background
    pub fn explain(&self, row: &TabularRow) -> Result<FeatureAttributions, ModelError> {
        let features = self.pipeline.transform(row)?;
        let explanation = self.explainer.explain(&features)?;

        if explanation.values.len() != self.feature_names.len() {
            return Err(ModelError::ShapeMismatch {
                context: "feature names",
                expected: self.feature_names.len(),
                actual: explanation.values.len(),
            });
        }

        let attributions = self
            .feature_names
            .iter()
            .cloned()
            .zip(explanation.values)
            .collect();

        Ok(FeatureAttributions {
            attributions,
            base_value: explanation.base_value,
        })
    }

    /// Raw linear score, the quantity attributions add up to
    pub fn decision_function(&self, row: &TabularRow) -> Result<f64, ModelError> {
        self.pipeline.decision_function(row)
    }

    pub fn background(&self) -> &Array2<f64> {
        &self.background
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// Single all-zero row as wide as the preprocessor output for the reference patient
fn build_background(pipeline: &Pipeline) -> Result<Array2<f64>, ModelError> {
    let reference = PatientRecord::reference().to_row();
    let width = pipeline.transform(&reference)?.len();
    Ok(Array2::zeros((1, width)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::artifact::tests_support::heart_artifact;

    fn service() -> PredictionService {
        PredictionService::from_artifact(heart_artifact(), "<memory>").unwrap()
    }

    #[test]
    fn test_background_matches_reference_width() {
        let service = service();
        let reference = PatientRecord::reference().to_row();
        let explained = service.explain(&reference).unwrap();

        assert_eq!(service.background().nrows(), 1);
        assert_eq!(service.background().ncols(), explained.attributions.len());
        assert!(service.background().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_explanation_is_additive() {
        let service = service();
        let row = PatientRecord::reference().to_row();

        let explained = service.explain(&row).unwrap();
        let total: f64 = explained.attributions.iter().map(|(_, v)| v).sum();
        let score = service.decision_function(&row).unwrap();

        assert!((explained.base_value + total - score).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_consistency() {
        let service = service();
        let prediction = service.predict(&PatientRecord::reference().to_row()).unwrap();

        assert!((0.0..=1.0).contains(&prediction.probability));
        assert_eq!(prediction.label == 1, prediction.probability > 0.5);
    }

    #[test]
    fn test_metadata() {
        let service = service();
        assert_eq!(service.metadata().classes, vec![0, 1]);
        assert_eq!(service.metadata().model_path, "<memory>");
        assert_eq!(service.feature_names().len(), 20);
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = PredictionService::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
