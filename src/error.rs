//! Error types for the projection engine and its file-based callers

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the projection engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// An update was requested for a date before the last recorded update
    #[error("update date {target} is before last update date {last_update}")]
    InvalidDateOrder {
        last_update: NaiveDate,
        target: NaiveDate,
    },

    /// A parameter is non-finite or outside its domain
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProjectionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ProjectionError::InvalidInput(message.into())
    }
}

/// Errors from reading or writing a saved projection
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from rendering an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("export buffer is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to flush export buffer: {0}")]
    Io(#[from] std::io::Error),
}
