//! Transport error types

use thiserror::Error;

/// Errors that can occur when talking to the chat server
#[derive(Error, Debug)]
pub enum TransportError {
    /// Server could not be reached
    #[error("Chat server unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Poll response body was not an event array
    #[error("Invalid event payload: {0}")]
    Decode(String),

    /// Base URI could not be used to build request URLs
    #[error("Invalid server URI: {0}")]
    InvalidUri(String),
}

impl TransportError {
    /// Map a reqwest error to the most specific variant
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Unavailable
        } else {
            TransportError::Request(e)
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
