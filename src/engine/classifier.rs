//! Logistic regression classifier (binary)

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{Classifier, LinearModel, ModelError};

/// Fitted binary logistic regression
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub classes: Vec<i64>,
    pub coef: Array1<f64>,
    pub intercept: f64,
}

/// Serialized form; `kind` leaves room for other linear classifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression {
        classes: Vec<i64>,
        coef: Vec<f64>,
        intercept: f64,
    },
}

impl LogisticRegression {
    pub fn new(classes: Vec<i64>, coef: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        if classes.len() != 2 {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier must have exactly 2 classes, found {}",
                classes.len()
            )));
        }
        if coef.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "classifier has no coefficients".to_string(),
            ));
        }
        if coef.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "classifier parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            classes,
            coef: Array1::from_vec(coef),
            intercept,
        })
    }

    pub fn n_features_in(&self) -> usize {
        self.coef.len()
    }

    fn check_shape(&self, features: &Array1<f64>) -> Result<(), ModelError> {
        if features.len() != self.coef.len() {
            return Err(ModelError::ShapeMismatch {
                context: "classifier",
                expected: self.coef.len(),
                actual: features.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<ClassifierSpec> for LogisticRegression {
    type Error = ModelError;

    fn try_from(spec: ClassifierSpec) -> Result<Self, Self::Error> {
        match spec {
            ClassifierSpec::LogisticRegression { classes, coef, intercept } => {
                Self::new(classes, coef, intercept)
            }
        }
    }
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn decision_function(&self, features: &Array1<f64>) -> Result<f64, ModelError> {
        self.check_shape(features)?;
        Ok(self.coef.dot(features) + self.intercept)
    }

    fn predict_proba(&self, features: &Array1<f64>) -> Result<Vec<f64>, ModelError> {
        let positive = sigmoid(self.decision_function(features)?);
        Ok(vec![1.0 - positive, positive])
    }

    fn predict(&self, features: &Array1<f64>) -> Result<i64, ModelError> {
        let score = self.decision_function(features)?;
        let index = if score > 0.0 { 1 } else { 0 };
        Ok(self.classes[index])
    }
}

impl LinearModel for LogisticRegression {
    fn coefficients(&self) -> &Array1<f64> {
        &self.coef
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> LogisticRegression {
        LogisticRegression::new(vec![0, 1], vec![0.5, 1.5, -1.0], 0.25).unwrap()
    }

    #[test]
    fn test_decision_function() {
        let score = model().decision_function(&array![2.0, -1.0, 0.5]).unwrap();
        // 1.0 - 1.5 - 0.5 + 0.25
        assert!((score - (-0.75)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_matches_probability() {
        let m = model();
        for x in [array![2.0, -1.0, 0.5], array![1.0, 1.0, 0.0], array![0.0, 0.0, 0.0]] {
            let proba = m.predict_proba(&x).unwrap();
            let label = m.predict(&x).unwrap();

            assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&proba[1]));
            assert_eq!(label == 1, proba[1] > 0.5);
        }
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = model().predict(&array![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(LogisticRegression::new(vec![0, 1, 2], vec![1.0], 0.0).is_err());
        assert!(LogisticRegression::new(vec![0, 1], vec![], 0.0).is_err());
        assert!(LogisticRegression::new(vec![0, 1], vec![f64::NAN], 0.0).is_err());
    }
}
