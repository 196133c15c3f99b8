//! Error types for delivery operations

use thiserror::Error;

/// Errors that can occur while delivering a record
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The request did not complete (connect failure, timeout, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The channel requires a success status and got something else
    #[error("Endpoint returned HTTP {0}")]
    Status(u16),

    /// The record could not be encoded
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Invalid delivery configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => DeliveryError::Status(status.as_u16()),
            None => DeliveryError::Transport(e.to_string()),
        }
    }
}
