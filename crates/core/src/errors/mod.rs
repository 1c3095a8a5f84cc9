//! Error types and Result alias for the CTBridge workspace

use thiserror::Error;

/// Main error type shared by the client, the session store and the worker
#[derive(Error, Debug)]
pub enum Error {
    /// A request was rejected before any network call was made
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The remote API answered with a non-success status or an error payload
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No session or access token found in database for shop: {0}")]
    SessionNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Job queue is closed")]
    QueueClosed,
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Error::ValidationError(reason.into())
    }
}

/// The URL is dropped: catalog URLs carry the API key in their query
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
