//! Unified error handling with Sentry integration.
//!
//! Every JSON endpoint answers with the envelope `{"success": bool, "data": ..}`.
//! Failures carry `{"message": ".."}` as data. Provider and server failures
//! are captured to Sentry before responding; details never reach the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::national_address::AddressError;
use crate::nonce::NonceError;

/// Message returned for any nonce failure.
pub const SECURITY_CHECK_FAILED: &str = "Security check failed";

/// Application-level error type for the service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A national address call failed; `message` is what the client sees.
    #[error("{message}: {source}")]
    Address {
        message: &'static str,
        #[source]
        source: AddressError,
    },

    /// Nonce missing, malformed, expired or forged.
    #[error("Invalid nonce: {0}")]
    Nonce(#[from] NonceError),

    /// Admin bearer token missing.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Admin bearer token wrong.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// Wrap a client error with the message the caller should see.
    #[must_use]
    pub fn address(message: &'static str, source: AddressError) -> Self {
        Self::Address { message, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Address { source, .. } => match source {
                AddressError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                AddressError::Validation(_) => StatusCode::BAD_REQUEST,
                AddressError::Transport(_) | AddressError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Nonce(_) | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Address {
                    source: AddressError::Transport(_) | AddressError::MalformedResponse(_),
                    ..
                }
        )
    }

    fn public_message(&self) -> String {
        match self {
            Self::Address { message, .. } => (*message).to_string(),
            Self::Nonce(_) => SECURITY_CHECK_FAILED.to_string(),
            Self::Unauthorized(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), failure(self.public_message())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// The response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Payload of a message-only response.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Wrap `data` in a successful envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// A successful envelope carrying only a message.
pub fn success_message(message: impl Into<String>) -> Json<Envelope<Message>> {
    success(Message {
        message: message.into(),
    })
}

/// A failed envelope carrying a message.
pub fn failure(message: impl Into<String>) -> Json<Envelope<Message>> {
    Json(Envelope {
        success: false,
        data: Message {
            message: message.into(),
        },
    })
}
