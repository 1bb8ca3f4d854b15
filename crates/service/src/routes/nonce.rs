//! Nonce issuing.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Envelope, Result, success};
use crate::extract::JsonBody;
use crate::middleware::check_admin_token;
use crate::nonce::NonceAction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NonceRequest {
    #[serde(default = "default_action")]
    pub action: NonceAction,
}

const fn default_action() -> NonceAction {
    NonceAction::Checkout
}

#[derive(Debug, Serialize)]
pub struct IssuedNonce {
    pub nonce: String,
    pub expires_in: u64,
}

/// `POST /api/nonce`
///
/// Checkout nonces are public. Admin nonces need the admin bearer token.
pub async fn issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<NonceRequest>,
) -> Result<Json<Envelope<IssuedNonce>>> {
    if req.action == NonceAction::Admin {
        check_admin_token(&headers, &state)?;
    }

    let nonce = state
        .nonces()
        .issue(req.action)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(success(IssuedNonce {
        nonce,
        expires_in: state.nonces().ttl().as_secs(),
    }))
}
