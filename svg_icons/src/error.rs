//! Error types for icon retrieval and configuration

use thiserror::Error;

/// Failure of a single icon fetch.
///
/// Cloneable because one result is delivered to every subscriber of a shared
/// in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconError {
    /// Name cannot be mapped to an asset location
    #[error("Invalid icon name: {0}")]
    InvalidName(String),
    /// Asset server answered with a non-success status
    #[error("HTTP error {status} for icon '{name}'")]
    HttpStatus { name: String, status: u16 },
    /// HTTP request failed (connection refused, timeout, body read, etc.)
    #[error("Network error: {0}")]
    Network(String),
    /// Content is not SVG markup
    #[error("Malformed icon content: {0}")]
    Malformed(String),
    /// Local asset could not be read
    #[error("I/O error: {0}")]
    Io(String),
    /// Fetch task ended without producing a value
    #[error("Icon fetch cancelled: {0}")]
    Cancelled(String),
}

impl From<reqwest::Error> for IconError {
    fn from(err: reqwest::Error) -> Self {
        IconError::Network(err.to_string())
    }
}

impl From<std::io::Error> for IconError {
    fn from(err: std::io::Error) -> Self {
        IconError::Io(err.to_string())
    }
}

/// Result alias for icon operations
pub type IconResult<T> = Result<T, IconError>;

/// Errors raised while loading or validating [`crate::config::IconConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
