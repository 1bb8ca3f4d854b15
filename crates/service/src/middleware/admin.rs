//! Bearer token extractor for admin endpoints.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;

use crate::error::{AppError, failure};
use crate::nonce::constant_time_compare;
use crate::state::AppState;

/// Extractor that requires `Authorization: Bearer <SERVICE_ADMIN_TOKEN>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdminToken) -> impl IntoResponse {
///     "ok"
/// }
/// ```
#[derive(Debug)]
pub struct RequireAdminToken;

/// Error returned when the admin token is absent or wrong.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminTokenRejection {
    /// No bearer token was sent.
    Missing,
    /// A bearer token was sent but does not match.
    Invalid,
}

impl IntoResponse for AdminTokenRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Missing => (StatusCode::UNAUTHORIZED, failure("Unauthorized")).into_response(),
            Self::Invalid => (StatusCode::FORBIDDEN, failure("Forbidden")).into_response(),
        }
    }
}

impl From<AdminTokenRejection> for AppError {
    fn from(rejection: AdminTokenRejection) -> Self {
        match rejection {
            AdminTokenRejection::Missing => Self::Unauthorized("Unauthorized".to_string()),
            AdminTokenRejection::Invalid => Self::Forbidden("Forbidden".to_string()),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AdminTokenRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_admin_token(&parts.headers, state).map(|()| Self)
    }
}

/// Check the admin bearer token in `headers`.
///
/// # Errors
///
/// Returns the rejection to send when the token is missing or wrong.
pub fn check_admin_token(headers: &HeaderMap, state: &AppState) -> Result<(), AdminTokenRejection> {
    let token = bearer_token(headers).ok_or(AdminTokenRejection::Missing)?;

    if constant_time_compare(token, state.config().admin_token.expose_secret()) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin token");
        Err(AdminTokenRejection::Invalid)
    }
}
