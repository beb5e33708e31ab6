//! Error types for dashboard Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dashboard Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error (missing or malformed client input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required credential or configuration is absent
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// Feature stub
    #[error("{0} not yet implemented")]
    NotImplemented(&'static str),

    /// External API returned a failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotConfigured(_) => 403,
            Error::NotImplemented(_) => 501,
            _ => 500,
        }
    }
}
