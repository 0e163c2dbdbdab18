//! Linear explainer
//!
//! Exact additive attributions for a linear model against a background
//! distribution. With coefficients `w`, intercept `b` and background mean `m`:
//!
//! ```text
//! expected_value = w · m + b
//! attribution_i  = w_i * (x_i - m_i)
//! expected_value + Σ attribution_i == w · x + b
//! ```

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use super::{LinearModel, ModelError};

/// Attribution for a single instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub values: Vec<f64>,
    pub base_value: f64,
}

#[derive(Debug, Clone)]
pub struct LinearExplainer {
    coef: Array1<f64>,
    mean: Array1<f64>,
    expected_value: f64,
}

impl LinearExplainer {
    pub fn new<M: LinearModel>(model: &M, background: &Array2<f64>) -> Result<Self, ModelError> {
        let coef = model.coefficients().clone();

        if background.ncols() != coef.len() {
            return Err(ModelError::ShapeMismatch {
                context: "explainer background",
                expected: coef.len(),
                actual: background.ncols(),
            });
        }

        let mean = background.mean_axis(Axis(0)).ok_or_else(|| {
            ModelError::InvalidArtifact("explainer background has no rows".to_string())
        })?;
        let expected_value = coef.dot(&mean) + model.intercept();

        Ok(Self {
            coef,
            mean,
            expected_value,
        })
    }

    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    pub fn explain(&self, features: &Array1<f64>) -> Result<Explanation, ModelError> {
        if features.len() != self.coef.len() {
            return Err(ModelError::ShapeMismatch {
                context: "explainer",
                expected: self.coef.len(),
                actual: features.len(),
            });
        }

        let values = (features - &self.mean) * &self.coef;

        Ok(Explanation {
            values: values.to_vec(),
            base_value: self.expected_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Classifier, LogisticRegression};
    use ndarray::array;

    fn model() -> LogisticRegression {
        LogisticRegression::new(vec![0, 1], vec![0.8, -1.2, 0.3], -0.4).unwrap()
    }

    #[test]
    fn test_zero_background_uses_intercept_as_base() {
        let explainer = LinearExplainer::new(&model(), &Array2::zeros((1, 3))).unwrap();
        let x = array![1.0, 2.0, -3.0];
        let explanation = explainer.explain(&x).unwrap();

        assert_eq!(explanation.base_value, -0.4);
        let expected = [0.8, -2.4, -0.9];
        for (value, want) in explanation.values.iter().zip(expected) {
            assert!((value - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_attributions_sum_to_decision_function() {
        let m = model();
        let background = array![[1.0, 0.0, 2.0], [3.0, 1.0, 0.0]];
        let explainer = LinearExplainer::new(&m, &background).unwrap();

        let x = array![0.5, -1.0, 4.0];
        let explanation = explainer.explain(&x).unwrap();
        let total = explanation.base_value + explanation.values.iter().sum::<f64>();

        assert!((total - m.decision_function(&x).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_shape_mismatch() {
        let m = model();
        assert!(matches!(
            LinearExplainer::new(&m, &Array2::zeros((1, 2))),
            Err(ModelError::ShapeMismatch { .. })
        ));

        let explainer = LinearExplainer::new(&m, &Array2::zeros((1, 3))).unwrap();
        assert!(matches!(
            explainer.explain(&array![1.0]),
            Err(ModelError::ShapeMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_empty_background_is_rejected() {
        let result = LinearExplainer::new(&model(), &Array2::zeros((0, 3)));
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));
    }
}
