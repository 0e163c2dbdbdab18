//! Model artifact - on-disk form of the fitted pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::ClassifierSpec;
use super::pipeline::{CLASSIFIER_STEP, PREPROCESSOR_STEP};
use super::{ColumnTransformer, LogisticRegression, ModelError, Pipeline};

/// Artifact layout version this build understands
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedSteps {
    #[serde(default)]
    pub preprocessor: Option<ColumnTransformer>,
    #[serde(default)]
    pub classifier: Option<ClassifierSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub named_steps: NamedSteps,
}

impl ModelArtifact {
    /// Read and parse an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::InvalidArtifact(format!(
                "unsupported format_version {} (expected {})",
                artifact.format_version, FORMAT_VERSION
            )));
        }
        Ok(artifact)
    }

    /// Validate both named steps and assemble the pipeline
    pub fn into_pipeline(self) -> Result<Pipeline, ModelError> {
        let preprocessor = self
            .named_steps
            .preprocessor
            .ok_or(ModelError::MissingStep(PREPROCESSOR_STEP))?;
        let classifier = self
            .named_steps
            .classifier
            .ok_or(ModelError::MissingStep(CLASSIFIER_STEP))?;

        preprocessor.validate()?;
        let classifier = LogisticRegression::try_from(classifier)?;

        Ok(Pipeline::new(preprocessor, classifier))
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::ModelArtifact;

    /// The artifact shipped next to the crate manifest
    pub const HEART_ARTIFACT_PATH: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/heart_failure_model.json");

    pub fn heart_artifact() -> ModelArtifact {
        ModelArtifact::load(HEART_ARTIFACT_PATH).expect("shipped artifact must load")
    }
}
