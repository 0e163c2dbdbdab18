//! Preprocessing - fitted column transformer
//!
//! Maps raw patient columns to the numeric feature vector the classifier was
//! trained on. Each step owns a list of input columns; step outputs are
//! concatenated in declaration order.
//!
//! Output feature naming:
//! - `standard_scaler` / `passthrough` emit the column name
//! - `one_hot` emits `<column>_<category>` per fitted category
//! - with `verbose_feature_names_out` every name gets a `<step>__` prefix

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{ModelError, TabularRow, Transformer};

/// What to do with a category that was not seen during fitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Encode the column as all zeros
    Ignore,
}

/// One fitted step of the column transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        name: String,
        columns: Vec<String>,
    },
}

impl ColumnStep {
    pub fn name(&self) -> &str {
        match self {
            ColumnStep::StandardScaler { name, .. }
            | ColumnStep::OneHot { name, .. }
            | ColumnStep::Passthrough { name, .. } => name,
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            ColumnStep::StandardScaler { columns, .. }
            | ColumnStep::OneHot { columns, .. }
            | ColumnStep::Passthrough { columns, .. } => columns,
        }
    }

    fn width(&self) -> usize {
        match self {
            ColumnStep::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
            other => other.columns().len(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let name = self.name();
        if name.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "preprocessor step without a name".to_string(),
            ));
        }

        match self {
            ColumnStep::StandardScaler { columns, mean, scale, .. } => {
                if mean.len() != columns.len() || scale.len() != columns.len() {
                    return Err(ModelError::InvalidArtifact(format!(
                        "step '{}': {} columns but {} means and {} scales",
                        name,
                        columns.len(),
                        mean.len(),
                        scale.len()
                    )));
                }
            }
            ColumnStep::OneHot { columns, categories, .. } => {
                if categories.len() != columns.len() {
                    return Err(ModelError::InvalidArtifact(format!(
                        "step '{}': {} columns but {} category lists",
                        name,
                        columns.len(),
                        categories.len()
                    )));
                }
                if let Some((column, _)) = columns
                    .iter()
                    .zip(categories)
                    .find(|(_, cats)| cats.is_empty())
                {
                    return Err(ModelError::InvalidArtifact(format!(
                        "step '{}': column '{}' has no fitted categories",
                        name, column
                    )));
                }
            }
            ColumnStep::Passthrough { .. } => {}
        }

        Ok(())
    }

    fn feature_names(&self) -> Vec<String> {
        match self {
            ColumnStep::OneHot { columns, categories, .. } => columns
                .iter()
                .zip(categories)
                .flat_map(|(column, cats)| cats.iter().map(move |cat| format!("{}_{}", column, cat)))
                .collect(),
            other => other.columns().to_vec(),
        }
    }

    fn transform_into(&self, row: &TabularRow, out: &mut Vec<f64>) -> Result<(), ModelError> {
        match self {
            ColumnStep::StandardScaler { columns, mean, scale, .. } => {
                for ((column, mu), sigma) in columns.iter().zip(mean).zip(scale) {
                    let value = row.number(column)?;
                    // Constant columns are fitted with a zero scale
                    let sigma = if *sigma == 0.0 { 1.0 } else { *sigma };
                    out.push((value - mu) / sigma);
                }
            }
            ColumnStep::OneHot { columns, categories, handle_unknown, .. } => {
                for (column, cats) in columns.iter().zip(categories) {
                    let value = row.category(column)?;
                    let hit = cats.iter().position(|cat| *cat == value);
                    if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                        return Err(ModelError::UnknownCategory {
                            column: column.clone(),
                            value,
                        });
                    }
                    out.extend((0..cats.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
                }
            }
            ColumnStep::Passthrough { columns, .. } => {
                for column in columns {
                    out.push(row.number(column)?);
                }
            }
        }
        Ok(())
    }
}

fn default_verbose_names() -> bool {
    true
}

/// Fitted column transformer; columns not named by any step are dropped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub transformers: Vec<ColumnStep>,
    #[serde(default = "default_verbose_names")]
    pub verbose_feature_names_out: bool,
}

impl ColumnTransformer {
    pub fn new(transformers: Vec<ColumnStep>) -> Result<Self, ModelError> {
        let transformer = Self {
            transformers,
            verbose_feature_names_out: true,
        };
        transformer.validate()?;
        Ok(transformer)
    }

    /// Check internal consistency of a deserialized transformer
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.transformers.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "preprocessor has no steps".to_string(),
            ));
        }

        for (i, step) in self.transformers.iter().enumerate() {
            step.validate()?;
            if self.transformers[..i].iter().any(|prev| prev.name() == step.name()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "duplicate preprocessor step '{}'",
                    step.name()
                )));
            }
        }

        Ok(())
    }
}

impl Transformer for ColumnTransformer {
    fn transform(&self, row: &TabularRow) -> Result<Array1<f64>, ModelError> {
        let mut out = Vec::with_capacity(self.n_features_out());
        for step in &self.transformers {
            step.transform_into(row, &mut out)?;
        }
        Ok(Array1::from_vec(out))
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.transformers
            .iter()
            .flat_map(|step| {
                let names = step.feature_names();
                let prefix = self
                    .verbose_feature_names_out
                    .then(|| format!("{}__", step.name()));
                names.into_iter().map(move |name| match &prefix {
                    Some(prefix) => format!("{}{}", prefix, name),
                    None => name,
                })
            })
            .collect()
    }

    fn n_features_out(&self) -> usize {
        self.transformers.iter().map(ColumnStep::width).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample_transformer(handle_unknown: HandleUnknown) -> ColumnTransformer {
        ColumnTransformer::new(vec![
            ColumnStep::StandardScaler {
                name: "num".to_string(),
                columns: strings(&["Age", "MaxHR"]),
                mean: vec![50.0, 140.0],
                scale: vec![10.0, 0.0],
            },
            ColumnStep::OneHot {
                name: "cat".to_string(),
                columns: strings(&["Sex", "ST_Slope"]),
                categories: vec![strings(&["F", "M"]), strings(&["Down", "Flat", "Up"])],
                handle_unknown,
            },
        ])
        .unwrap()
    }

    fn sample_row() -> TabularRow {
        TabularRow::new()
            .with("Age", 60_i64.into())
            .with("Sex", "M".into())
            .with("MaxHR", 150_i64.into())
            .with("ST_Slope", "Flat".into())
            .with("Cholesterol", 200_i64.into())
    }

    #[test]
    fn test_transform_scales_and_encodes() {
        let transformer = sample_transformer(HandleUnknown::Error);
        let out = transformer.transform(&sample_row()).unwrap();

        // Zero scale is treated as one
        assert_eq!(out.to_vec(), vec![1.0, 10.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(out.len(), transformer.n_features_out());
    }

    #[test]
    fn test_feature_names_follow_output_order() {
        let mut transformer = sample_transformer(HandleUnknown::Error);
        assert_eq!(
            transformer.feature_names_out(),
            strings(&[
                "num__Age",
                "num__MaxHR",
                "cat__Sex_F",
                "cat__Sex_M",
                "cat__ST_Slope_Down",
                "cat__ST_Slope_Flat",
                "cat__ST_Slope_Up",
            ])
        );

        transformer.verbose_feature_names_out = false;
        assert_eq!(transformer.feature_names_out()[3], "Sex_M");
    }

    #[test]
    fn test_unknown_category() {
        let row = sample_row().with("Sex", "X".into());

        let strict = sample_transformer(HandleUnknown::Error);
        assert!(matches!(
            strict.transform(&row),
            Err(ModelError::UnknownCategory { .. })
        ));

        let lenient = sample_transformer(HandleUnknown::Ignore);
        let out = lenient.transform(&row).unwrap();
        assert_eq!(out[2], 0.0);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_passthrough_and_missing_column() {
        let transformer = ColumnTransformer::new(vec![ColumnStep::Passthrough {
            name: "raw".to_string(),
            columns: strings(&["Oldpeak"]),
        }])
        .unwrap();

        let row = TabularRow::new().with("Oldpeak", 2.5.into());
        assert_eq!(transformer.transform(&row).unwrap().to_vec(), vec![2.5]);
        assert!(matches!(
            transformer.transform(&TabularRow::new()),
            Err(ModelError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_validation_rejects_inconsistent_steps() {
        let result = ColumnTransformer::new(vec![ColumnStep::StandardScaler {
            name: "num".to_string(),
            columns: strings(&["Age", "MaxHR"]),
            mean: vec![50.0],
            scale: vec![10.0, 20.0],
        }]);
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));

        let result = ColumnTransformer::new(vec![
            ColumnStep::Passthrough { name: "a".to_string(), columns: strings(&["Age"]) },
            ColumnStep::Passthrough { name: "a".to_string(), columns: strings(&["MaxHR"]) },
        ]);
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));

        assert!(ColumnTransformer::new(vec![]).is_err());
    }
}
