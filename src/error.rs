//! Error types for the form controller

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the card form
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid controller configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A form field failed its declared constraint at the serialization boundary
    #[error("Form validation failed: {0}")]
    ValidationError(String),

    /// The render endpoint reported a failure (non-2xx response)
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Network or transport error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
