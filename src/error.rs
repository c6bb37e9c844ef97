//! Error types shared across the crate

use thiserror::Error;

/// Errors raised by the console core
///
/// Request attempts never surface these directly: the network layer turns
/// them into a [`crate::models::ResponseInfo`] outcome.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Endpoint cannot be empty.")]
    InvalidEndpoint,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Request definition not found: {0}")]
    NotFound(String),

    #[error("Not overwriting {0}: it could not be read or backed up")]
    ReadOnly(String),
}

impl From<serde_yaml::Error> for ConsoleError {
    fn from(err: serde_yaml::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        let msg = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            format!("Request failed: {}", err)
        };
        ConsoleError::Network(msg)
    }
}

/// Result type for the consolex crate
pub type Result<T> = std::result::Result<T, ConsoleError>;
