//! Pipeline - preprocessing followed by classification
//!
//! Mirrors the named-step layout of the artifact: `preprocessor` then
//! `classifier`. Both steps are also handed out separately so the explainer
//! can run on transformed features.

use std::sync::Arc;

use ndarray::Array1;

use super::{Classifier, ColumnTransformer, LogisticRegression, ModelError, TabularRow, Transformer};

pub const PREPROCESSOR_STEP: &str = "preprocessor";
pub const CLASSIFIER_STEP: &str = "classifier";

#[derive(Debug, Clone)]
pub struct Pipeline {
    preprocessor: Arc<ColumnTransformer>,
    classifier: Arc<LogisticRegression>,
}

impl Pipeline {
    pub fn new(preprocessor: ColumnTransformer, classifier: LogisticRegression) -> Self {
        Self {
            preprocessor: Arc::new(preprocessor),
            classifier: Arc::new(classifier),
        }
    }

    pub fn preprocessor(&self) -> &Arc<ColumnTransformer> {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &Arc<LogisticRegression> {
        &self.classifier
    }

    pub fn transform(&self, row: &TabularRow) -> Result<Array1<f64>, ModelError> {
        self.preprocessor.transform(row)
    }

    pub fn decision_function(&self, row: &TabularRow) -> Result<f64, ModelError> {
        self.classifier.decision_function(&self.transform(row)?)
    }

    pub fn predict(&self, row: &TabularRow) -> Result<i64, ModelError> {
        self.classifier.predict(&self.transform(row)?)
    }

    pub fn predict_proba(&self, row: &TabularRow) -> Result<Vec<f64>, ModelError> {
        self.classifier.predict_proba(&self.transform(row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::preprocess::ColumnStep;

    fn pipeline() -> Pipeline {
        let preprocessor = ColumnTransformer::new(vec![
            ColumnStep::StandardScaler {
                name: "num".to_string(),
                columns: vec!["Age".to_string()],
                mean: vec![50.0],
                scale: vec![10.0],
            },
            ColumnStep::OneHot {
                name: "cat".to_string(),
                columns: vec!["Sex".to_string()],
                categories: vec![vec!["F".to_string(), "M".to_string()]],
                handle_unknown: Default::default(),
            },
        ])
        .unwrap();
        let classifier = LogisticRegression::new(vec![0, 1], vec![2.0, -0.5, 0.5], -0.25).unwrap();
        Pipeline::new(preprocessor, classifier)
    }

    #[test]
    fn test_pipeline_runs_both_steps() {
        let p = pipeline();
        let row = TabularRow::new().with("Age", 70_i64.into()).with("Sex", "M".into());

        // 2.0 * 2.0 + 0.5 - 0.25
        assert!((p.decision_function(&row).unwrap() - 4.25).abs() < 1e-12);
        assert_eq!(p.predict(&row).unwrap(), 1);

        let proba = p.predict_proba(&row).unwrap();
        assert!(proba[1] > 0.98);
    }

    #[test]
    fn test_pipeline_propagates_transform_errors() {
        let p = pipeline();
        let row = TabularRow::new().with("Age", 70_i64.into());
        assert!(matches!(p.predict(&row), Err(ModelError::MissingColumn(_))));
    }
}
