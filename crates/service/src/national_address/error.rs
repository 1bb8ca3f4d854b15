//! National address client errors.

use saudi_address_core::ValidationError;
use thiserror::Error;

/// Errors that can occur when talking to the national address API.
#[derive(Debug, Error)]
pub enum AddressError {
    /// No API key is configured; no request was attempted.
    #[error("National address API is not configured")]
    NotConfigured,

    /// Caller input failed shape checks; no request was attempted.
    #[error("Invalid address input: {0}")]
    Validation(#[from] ValidationError),

    /// The request did not complete.
    #[error("National address request failed: {0}")]
    Transport(#[from] TransportError),

    /// The provider replied with something other than the expected shape.
    #[error("Unexpected national address response: {0}")]
    MalformedResponse(String),
}

/// Network-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Could not connect or the connection dropped.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The request URL could not be built from the configured base URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Other(err.to_string())
        }
    }
}
