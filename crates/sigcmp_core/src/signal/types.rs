//! Core types for signal handling.

use serde::{Deserialize, Serialize};

/// Raw input accepted by every public operation.
///
/// The set of accepted shapes is closed: callers pick the variant (or rely on
/// the `From` conversions) and the normalizer flattens it into a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalInput {
    /// A single sample.
    Scalar(f64),
    /// A flat, ordered sequence of samples.
    Sequence(Vec<f64>),
    /// A 2-D labeled table, flattened row-major.
    Table(Table),
    /// Textual input, converted on a best-effort basis.
    Text(String),
}

impl From<f64> for SignalInput {
    fn from(value: f64) -> Self {
        SignalInput::Scalar(value)
    }
}

impl From<i32> for SignalInput {
    fn from(value: i32) -> Self {
        SignalInput::Scalar(f64::from(value))
    }
}

impl From<i64> for SignalInput {
    fn from(value: i64) -> Self {
        SignalInput::Scalar(value as f64)
    }
}

impl From<Vec<f64>> for SignalInput {
    fn from(values: Vec<f64>) -> Self {
        SignalInput::Sequence(values)
    }
}

impl From<&Vec<f64>> for SignalInput {
    fn from(values: &Vec<f64>) -> Self {
        SignalInput::Sequence(values.clone())
    }
}

impl From<&[f64]> for SignalInput {
    fn from(values: &[f64]) -> Self {
        SignalInput::Sequence(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for SignalInput {
    fn from(values: [f64; N]) -> Self {
        SignalInput::Sequence(values.to_vec())
    }
}

impl From<Table> for SignalInput {
    fn from(table: Table) -> Self {
        SignalInput::Table(table)
    }
}

impl From<&Table> for SignalInput {
    fn from(table: &Table) -> Self {
        SignalInput::Table(table.clone())
    }
}

impl From<Column> for SignalInput {
    fn from(column: Column) -> Self {
        SignalInput::Sequence(column.values)
    }
}

impl From<&Column> for SignalInput {
    fn from(column: &Column) -> Self {
        SignalInput::Sequence(column.values.clone())
    }
}

impl From<&str> for SignalInput {
    fn from(text: &str) -> Self {
        SignalInput::Text(text.to_string())
    }
}

impl From<String> for SignalInput {
    fn from(text: String) -> Self {
        SignalInput::Text(text)
    }
}

impl From<&SignalInput> for SignalInput {
    fn from(input: &SignalInput) -> Self {
        input.clone()
    }
}

/// A 2-D labeled table of samples.
///
/// Labels are carried for the caller's benefit only; rows are always matched
/// by position, never by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    /// Create a table from rows, labelling rows and columns by position.
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        Self {
            row_labels: (0..rows.len()).map(|i| i.to_string()).collect(),
            column_labels: (0..n_cols).map(|i| i.to_string()).collect(),
            rows,
        }
    }

    /// Create a single-column table (one sample per row).
    pub fn from_column(values: Vec<f64>) -> Self {
        Self::new(values.into_iter().map(|v| vec![v]).collect())
    }

    /// Replace the row labels.
    pub fn with_row_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.row_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the column labels.
    pub fn with_column_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.column_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Row labels.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column labels.
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Raw rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// (rows, columns) as declared by the labels.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.column_labels.len())
    }

    /// Swap rows and columns (labels included).
    ///
    /// Assumes a rectangular table; short rows contribute NaN.
    pub fn transpose(&self) -> Self {
        let n_cols = self.column_labels.len();
        let rows = (0..n_cols)
            .map(|c| {
                self.rows
                    .iter()
                    .map(|row| row.get(c).copied().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        Self {
            row_labels: self.column_labels.clone(),
            column_labels: self.row_labels.clone(),
            rows,
        }
    }

    /// Flatten the table row-major.
    ///
    /// Fails when the rows do not match the declared shape.
    pub fn flatten(&self) -> SignalResult<Vec<f64>> {
        let (n_rows, n_cols) = self.shape();
        if self.rows.len() != n_rows {
            return Err(SignalError::TypeConversion(format!(
                "table has {} rows but {} row labels",
                self.rows.len(),
                n_rows
            )));
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_cols)
        {
            return Err(SignalError::TypeConversion(format!(
                "table row {} has {} values, expected {}",
                idx,
                row.len(),
                n_cols
            )));
        }
        Ok(self.rows.iter().flatten().copied().collect())
    }
}

/// A single named column of samples, the canonical single-column table form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (e.g. `"meas"` or `"ref"`).
    pub name: String,
    /// Samples, NaN marks a missing position.
    pub values: Vec<f64>,
}

impl Column {
    /// Create a named column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of positions (missing ones included).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no positions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing positions.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Values with missing positions removed.
    pub fn dropna(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }

    /// Consume the column, returning its samples.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Literal sample values (e.g. sensor error codes) treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvalidValues(Vec<f64>);

impl InvalidValues {
    /// An empty set: every sample is valid.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Create a set from a list of literal values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Check whether a sample is one of the invalid literals.
    pub fn contains(&self, sample: f64) -> bool {
        self.0.iter().any(|&v| v == sample)
    }

    /// The invalid literals.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<f64> for InvalidValues {
    fn from(value: f64) -> Self {
        Self(vec![value])
    }
}

impl From<i32> for InvalidValues {
    fn from(value: i32) -> Self {
        Self(vec![f64::from(value)])
    }
}

impl From<Vec<f64>> for InvalidValues {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for InvalidValues {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for InvalidValues {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&InvalidValues> for InvalidValues {
    fn from(values: &InvalidValues) -> Self {
        values.clone()
    }
}

/// Error types for signal operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalError {
    /// Input shape could not be converted to a numeric sequence.
    #[error("Type conversion failed: {0}")]
    TypeConversion(String),

    /// A parameter is out of its valid range (zero window, negative threshold...).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A statistic was requested over empty or degenerate data.
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),
}

/// Type alias for signal results.
pub type SignalResult<T> = Result<T, SignalError>;
