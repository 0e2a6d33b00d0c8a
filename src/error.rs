//! Error types for the composable-eda library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("Missing column '{0}' in table")]
    MissingColumn(String),

    #[error("Invalid column type for '{column}': expected {expected}, found {actual}")]
    InvalidColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid method '{0}': expected 'iqr' or 'percentile'")]
    InvalidMethod(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, EdaError>;
