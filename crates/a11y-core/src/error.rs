//! Centralized error types for the analyzer.

use thiserror::Error;

/// Main error type for analyzer operations.
#[derive(Error, Debug)]
pub enum A11yError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Invalid report ID format: {0}")]
    InvalidReportId(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("AI suggestion failed: {0}")]
    Suggestion(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] a11y_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for analyzer operations.
pub type A11yResult<T> = Result<T, A11yError>;

impl A11yError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
