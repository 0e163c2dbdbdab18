//! Engine Module - model loading, inference and attribution
//!
//! The artifact is a fitted pipeline: a column transformer followed by a
//! linear classifier. Everything here is built once at startup and only
//! read afterwards.

pub mod table;
pub mod preprocess;
pub mod classifier;
pub mod pipeline;
pub mod explainer;
pub mod artifact;
pub mod service;

use ndarray::Array1;
use thiserror::Error;

// Re-export common types
pub use table::TabularRow;
pub use preprocess::ColumnTransformer;
pub use classifier::LogisticRegression;
pub use pipeline::Pipeline;
pub use explainer::LinearExplainer;
pub use artifact::ModelArtifact;
pub use service::{PredictionService, Prediction};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artifact has no '{0}' step")]
    MissingStep(&'static str),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("input is missing column '{0}'")]
    MissingColumn(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("shape mismatch in {context}: expected {expected} features, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Something that turns a tabular row into a numeric feature vector
pub trait Transformer: Send + Sync {
    fn transform(&self, row: &TabularRow) -> Result<Array1<f64>, ModelError>;

    /// Output feature names, in the same order as `transform` emits them
    fn feature_names_out(&self) -> Vec<String>;

    fn n_features_out(&self) -> usize {
        self.feature_names_out().len()
    }
}

/// Something that scores a transformed feature vector
pub trait Classifier: Send + Sync {
    /// Class labels, in probability-column order
    fn classes(&self) -> &[i64];

    /// Raw score (log-odds of the second class)
    fn decision_function(&self, features: &Array1<f64>) -> Result<f64, ModelError>;

    /// Probability per class, ordered like `classes()`
    fn predict_proba(&self, features: &Array1<f64>) -> Result<Vec<f64>, ModelError>;

    fn predict(&self, features: &Array1<f64>) -> Result<i64, ModelError>;
}

/// Linear models expose their parameters for attribution
pub trait LinearModel {
    fn coefficients(&self) -> &Array1<f64>;
    fn intercept(&self) -> f64;
}
