//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised while loading data, configuring or training a classifier.
///
/// Nothing is retried: every variant is fatal to the run that produced it and
/// is propagated to the caller with `?`.
#[derive(Debug, Error)]
pub enum LogRegError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// A requested column is not present in the table header.
    #[error("missing column `{0}`")]
    MissingColumn(String),

    /// A cell could not be parsed as a floating point number.
    #[error("row {row}, column `{column}`: cannot parse `{value}` as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    #[error("dataset is empty")]
    EmptyDataset,

    /// Labels of a binary classifier must be exactly `0.0` or `1.0`.
    #[error("label {value} at row {row} is not binary (expected 0 or 1)")]
    NonBinaryLabel { row: usize, value: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Graph construction or session execution failure.
    #[error("graph error: {0}")]
    Graph(String),

    #[error("classifier `{0}` has not been fitted")]
    NotFitted(&'static str),
}

pub type Result<T> = std::result::Result<T, LogRegError>;

impl LogRegError {
    pub(crate) fn shape(expected: impl ToString, got: impl ToString) -> Self {
        LogRegError::ShapeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}
