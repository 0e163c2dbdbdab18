//! Patient record model

use serde::{Deserialize, Serialize};

use crate::engine::TabularRow;

/// Clinical input for one patient. Field names match the training columns.
///
/// Every field is required; there is no range checking. Numeric fields also
/// accept numeric strings, since form clients post every value as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Age", deserialize_with = "lax::integer")]
    pub age: i64,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: String,
    #[serde(rename = "RestingBP", deserialize_with = "lax::integer")]
    pub resting_bp: i64,
    #[serde(rename = "Cholesterol", deserialize_with = "lax::integer")]
    pub cholesterol: i64,
    #[serde(rename = "FastingBS", deserialize_with = "lax::integer")]
    pub fasting_bs: i64,
    #[serde(rename = "RestingECG")]
    pub resting_ecg: String,
    #[serde(rename = "MaxHR", deserialize_with = "lax::integer")]
    pub max_hr: i64,
    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: String,
    #[serde(rename = "Oldpeak", deserialize_with = "lax::float")]
    pub oldpeak: f64,
    #[serde(rename = "ST_Slope")]
    pub st_slope: String,
}

impl PatientRecord {
    /// Representative patient used to size the explainer background
    pub fn reference() -> Self {
        Self {
            age: 50,
            sex: "M".to_string(),
            chest_pain_type: "ATA".to_string(),
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: 0,
            resting_ecg: "Normal".to_string(),
            max_hr: 150,
            exercise_angina: "N".to_string(),
            oldpeak: 1.0,
            st_slope: "Up".to_string(),
        }
    }

    /// Single-row table in training column order
    pub fn to_row(&self) -> TabularRow {
        TabularRow::new()
            .with("Age", self.age.into())
            .with("Sex", self.sex.as_str().into())
            .with("ChestPainType", self.chest_pain_type.as_str().into())
            .with("RestingBP", self.resting_bp.into())
            .with("Cholesterol", self.cholesterol.into())
            .with("FastingBS", self.fasting_bs.into())
            .with("RestingECG", self.resting_ecg.as_str().into())
            .with("MaxHR", self.max_hr.into())
            .with("ExerciseAngina", self.exercise_angina.as_str().into())
            .with("Oldpeak", self.oldpeak.into())
            .with("ST_Slope", self.st_slope.as_str().into())
    }
}

/// Numeric coercion for request bodies.
///
/// Integers accept JSON integers, integral floats (`150.0`) and strings that
/// parse to either. Floats accept any JSON number or a numeric string.
/// Fractional values for integers, non-numeric strings, booleans and
/// non-finite floats are rejected.
mod lax {
    use std::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(IntegerVisitor)
    }

    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    fn integral(value: f64) -> Option<i64> {
        let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
        (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
    }

    struct IntegerVisitor;

    impl<'de> Visitor<'de> for IntegerVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a valid integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            integral(value).ok_or_else(|| E::invalid_value(Unexpected::Float(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            let trimmed = value.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a valid number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}
