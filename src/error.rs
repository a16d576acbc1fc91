//! Error types for the brent-analytics library.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while building series, detecting change points,
/// fitting forecasters or running the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Series too short for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter or parameter combination.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The series (or the fitted AR polynomial) is not stationary.
    #[error("non-stationary: {0}")]
    NonStationary(String),

    /// The optimizer exhausted its iteration budget.
    #[error("optimizer did not converge within {iterations} iterations")]
    Convergence { iterations: usize },

    /// Training loss became NaN or infinite.
    #[error("training diverged at epoch {epoch}")]
    TrainingDiverged { epoch: usize },

    /// Timestamps are out of order or duplicated.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// NaN or infinite values in the input.
    #[error("missing values detected in data")]
    MissingValues,

    /// A calendar gap the series cadence does not allow.
    #[error("missing dates between {after} and {before}")]
    MissingDates { after: NaiveDate, before: NaiveDate },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Reading an input file failed.
    #[error("io error: {0}")]
    Io(String),

    /// An input record or config file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A result could not be written out.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}
