//! Storefront address verification.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use saudi_address_core::{Language, ValidationError};
use serde::Deserialize;
use tracing::instrument;

use super::form;
use crate::error::{AppError, Result, failure, success_message};
use crate::extract::JsonBody;
use crate::national_address::AddressError;
use crate::nonce::NonceAction;
use crate::state::AppState;
use crate::verifier::VerificationOutcome;

pub const VERIFIED: &str = "Address verified successfully";
pub const NOT_VERIFIED: &str = "Address verification failed";
pub const NUMBERS_REQUIRED: &str =
    "Building number and postal code are required for verification";

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(default, deserialize_with = "form::number_text")]
    pub building_number: String,
    #[serde(default, deserialize_with = "form::number_text")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "form::number_text")]
    pub additional_number: String,
    #[serde(default, deserialize_with = "form::language")]
    pub language: Language,
}

/// Client-facing message for input the verifier refused.
fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Missing { .. } | ValidationError::NotPositive { .. } => {
            NUMBERS_REQUIRED.to_string()
        }
        ValidationError::NotNumeric { .. } | ValidationError::Negative { .. } => err.to_string(),
    }
}

/// `POST /api/verify`
///
/// A well-formed address the provider does not know is answered with `200`
/// and `success: false`.
#[instrument(skip(state, req), fields(language = %req.language))]
pub async fn verify(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VerifyRequest>,
) -> Result<Response> {
    state.check_nonce(NonceAction::Checkout, &req.nonce)?;

    let outcome = state
        .verifier()
        .verify(
            &req.building_number,
            &req.postal_code,
            &req.additional_number,
            req.language,
        )
        .await;

    match outcome {
        Ok(VerificationOutcome::Verified) => Ok(success_message(VERIFIED).into_response()),
        Ok(VerificationOutcome::NotFound) => {
            Ok((StatusCode::OK, failure(NOT_VERIFIED)).into_response())
        }
        Err(AddressError::Validation(err)) => Err(AppError::BadRequest(validation_message(&err))),
        Err(err) => Err(AppError::address(NOT_VERIFIED, err)),
    }
}
