//! Error types for sonar-dadapush.

use thiserror::Error;

/// Main error type for sonar-dadapush.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Corrupted project configuration; aborts the current event
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed analysis event
    #[error("Input error: {0}")]
    Input(String),

    /// Push transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
