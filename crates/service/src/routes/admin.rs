//! Admin endpoints.

use axum::{Json, extract::State};
use saudi_address_core::Language;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{AppError, Envelope, Result, success};
use crate::extract::JsonBody;
use crate::middleware::RequireAdminToken;
use crate::national_address::AddressError;
use crate::nonce::NonceAction;
use crate::state::AppState;

pub const NOT_CONFIGURED: &str = "API is not configured. Please set your API key.";
pub const CONNECTION_OK: &str = "API connection successful!";
pub const CONNECTION_FAILED: &str = "API connection failed. Please check your API key and URL.";

#[derive(Debug, Deserialize)]
pub struct TestConnectionRequest {
    #[serde(default)]
    pub nonce: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectionReport {
    pub message: &'static str,
    pub regions_count: usize,
}

/// `POST /api/admin/test`
///
/// Fetches regions in Arabic, skipping the cache, and reports how many came
/// back.
#[instrument(skip_all)]
pub async fn test_connection(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TestConnectionRequest>,
) -> Result<Json<Envelope<ConnectionReport>>> {
    state.check_nonce(NonceAction::Admin, &req.nonce)?;

    let regions_count = state
        .client()
        .check_connection(Language::Arabic)
        .await
        .map_err(|e| match e {
            AddressError::NotConfigured => AppError::address(NOT_CONFIGURED, e),
            other => AppError::address(CONNECTION_FAILED, other),
        })?;

    info!(regions_count, "National address API connection test passed");

    Ok(success(ConnectionReport {
        message: CONNECTION_OK,
        regions_count,
    }))
}
