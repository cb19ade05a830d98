//! Error types for the forecasting pipeline.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`ForecastError`]. Variants carry enough context (offending date,
//! category or row count) to diagnose a failure without re-running.

use chrono::NaiveDate;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input records could not be interpreted (bad dates, duplicate keys,
    /// non-finite prices).
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Not enough rows to produce a non-degenerate train/held-out split.
    #[error(
        "Insufficient data: {rows} rows gives {train_rows} training / {test_rows} held-out rows (need at least {required} training and 1 held-out)"
    )]
    InsufficientData {
        /// Total rows offered to the trainer
        rows: usize,
        /// Rows that would land in the training split
        train_rows: usize,
        /// Rows that would land in the held-out split
        test_rows: usize,
        /// Minimum training rows required
        required: usize,
    },

    /// A request failed boundary validation (horizon, category, event date).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A feature vector did not match the schema fixed at training time.
    #[error("Schema mismatch: expected {expected} columns, got {actual}")]
    SchemaMismatch {
        /// Columns in the training schema
        expected: usize,
        /// Columns offered
        actual: usize,
    },

    /// A column name that the training schema does not contain.
    #[error("Unknown feature column '{0}'")]
    UnknownFeature(String),

    /// One request of a batch failed; `source` keeps the original error.
    #[error("Scenario {index} ('{category}' on {event_date}) failed: {source}")]
    Scenario {
        /// Position of the request in the batch
        index: usize,
        category: String,
        event_date: NaiveDate,
        #[source]
        source: Box<ForecastError>,
    },

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl ForecastError {
    /// Build a [`ForecastError::DataFormat`] from any message.
    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat(msg.into())
    }

    /// Build a [`ForecastError::Validation`] from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Duplicate key on a date-indexed series.
    pub fn duplicate_date(series: &str, date: NaiveDate) -> Self {
        Self::DataFormat(format!("duplicate {series} date {date}"))
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message_has_counts() {
        let err = ForecastError::InsufficientData {
            rows: 5,
            train_rows: 4,
            test_rows: 1,
            required: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("5 rows"));
        assert!(msg.contains("at least 10"));
    }

    #[test]
    fn test_duplicate_date_names_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = ForecastError::duplicate_date("price", date);
        assert!(matches!(err, ForecastError::DataFormat(_)));
        assert!(err.to_string().contains("2024-03-01"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ForecastError = io.into();
        assert!(matches!(err, ForecastError::Io(_)));
    }
}
