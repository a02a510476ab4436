//! Gateway error types.

use thiserror::Error;

/// Error type for remote service calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl GatewayError {
    /// Map a transport-level reqwest error to its gateway category.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout(e.to_string())
        } else if e.is_connect() {
            GatewayError::Connection(e.to_string())
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}
