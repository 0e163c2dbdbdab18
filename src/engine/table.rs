//! Tabular input row
//!
//! A single row of named columns, the shape every transformer consumes.
//! Column order is the insertion order.

use serde::Serialize;

use super::ModelError;

/// One cell of a tabular row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Category(String),
}

/// Single-row table keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularRow {
    columns: Vec<(String, Cell)>,
}

impl TabularRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated column name replaces the earlier value
    pub fn with(mut self, column: &str, cell: Cell) -> Self {
        self.insert(column, cell);
        self
    }

    pub fn insert(&mut self, column: &str, cell: Cell) {
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = cell,
            None => self.columns.push((column.to_string(), cell)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Numeric value of a column; categorical cells are rejected
    pub fn number(&self, column: &str) -> Result<f64, ModelError> {
        match self.get(column) {
            Some(Cell::Number(value)) => Ok(*value),
            Some(Cell::Category(value)) => Err(ModelError::InvalidInput(format!(
                "column '{}' expected a number, got category '{}'",
                column, value
            ))),
            None => Err(ModelError::MissingColumn(column.to_string())),
        }
    }

    /// String form of a column, used by categorical encoders.
    /// Numbers are rendered the way they were fitted (integers without a fraction).
    pub fn category(&self, column: &str) -> Result<String, ModelError> {
        match self.get(column) {
            Some(Cell::Category(value)) => Ok(value.clone()),
            Some(Cell::Number(value)) if value.fract() == 0.0 && value.is_finite() => {
                Ok(format!("{}", *value as i64))
            }
            Some(Cell::Number(value)) => Ok(value.to_string()),
            None => Err(ModelError::MissingColumn(column.to_string())),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Category(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Category(value)
    }
}
