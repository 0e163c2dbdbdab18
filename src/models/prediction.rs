//! Prediction and explanation response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::service::FeatureAttributions;
use crate::engine::Prediction;

pub const POSITIVE_LABEL: &str = "Heart Disease Detected";
pub const NEGATIVE_LABEL: &str = "No Heart Disease";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: i64,
    pub probability: f64,
    pub result: String,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        let result = if p.label == 1 { POSITIVE_LABEL } else { NEGATIVE_LABEL };
        Self {
            prediction: p.label,
            probability: p.probability,
            result: result.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub shap_values: Vec<FeatureAttribution>,
    pub base_value: f64,
}

impl From<FeatureAttributions> for ExplanationResponse {
    fn from(explained: FeatureAttributions) -> Self {
        Self {
            shap_values: explained
                .attributions
                .into_iter()
                .map(|(feature, value)| FeatureAttribution { feature, value })
                .collect(),
            base_value: explained.base_value,
        }
    }
}

/// Static description of the loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub name: String,
    pub model_path: String,
    pub loaded_at: DateTime<Utc>,
    pub classes: Vec<i64>,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub background: BackgroundInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundInfo {
    pub rows: usize,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_label_follows_prediction() {
        let positive = PredictionResponse::from(Prediction { label: 1, probability: 0.91 });
        assert_eq!(positive.result, POSITIVE_LABEL);

        let negative = PredictionResponse::from(Prediction { label: 0, probability: 0.12 });
        assert_eq!(negative.result, NEGATIVE_LABEL);
        assert_eq!(negative.prediction, 0);
    }

    #[test]
    fn test_explanation_wire_shape() {
        let response = ExplanationResponse::from(FeatureAttributions {
            attributions: vec![("num__Age".to_string(), 0.25)],
            base_value: -0.5,
        });
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["shap_values"][0]["feature"], "num__Age");
        assert_eq!(value["shap_values"][0]["value"], 0.25);
        assert_eq!(value["base_value"], -0.5);
    }
}
