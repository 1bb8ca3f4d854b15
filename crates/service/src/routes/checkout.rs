//! Checkout submission handling.
//!
//! The host posts the submitted national address fields here before placing
//! an order. The reply is either the values to store (order meta and
//! customer meta keys) or every field problem found.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use saudi_address_core::{AddressField, CheckoutAddress, CheckoutFieldError, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::verify::NOT_VERIFIED;
use crate::error::{Envelope, Result, success};
use crate::extract::JsonBody;
use crate::national_address::AddressError;
use crate::nonce::NonceAction;
use crate::state::AppState;
use crate::verifier::VerificationOutcome;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(flatten)]
    pub address: CheckoutAddress,
    /// The customer's saved address, used to fill blank fields.
    #[serde(default)]
    pub saved: Option<CheckoutAddress>,
}

/// Values the host should persist.
#[derive(Debug, Serialize)]
pub struct CheckoutValues {
    /// Keyed by order meta key (`_saudi_region`, ...).
    pub order_meta: BTreeMap<&'static str, String>,
    /// Keyed by customer meta key (`saudi_region`, ...).
    pub customer_meta: BTreeMap<&'static str, String>,
    /// Provider verdict; `None` when verification is off or unavailable.
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FieldProblem {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutProblems {
    pub message: &'static str,
    pub errors: Vec<FieldProblem>,
}

impl From<&CheckoutFieldError> for FieldProblem {
    fn from(err: &CheckoutFieldError) -> Self {
        Self {
            field: err.field().form_key(),
            message: err.to_string(),
        }
    }
}

fn rejected(errors: Vec<FieldProblem>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Envelope {
            success: false,
            data: CheckoutProblems {
                message: "Please correct the national address fields.",
                errors,
            },
        }),
    )
        .into_response()
}

/// `POST /api/checkout/validate`
#[instrument(skip_all)]
pub async fn validate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CheckoutRequest>,
) -> Result<Response> {
    state.check_nonce(NonceAction::Checkout, &req.nonce)?;

    let settings = state.config().checkout;
    let mut address = req.address;
    if let Some(saved) = &req.saved {
        address.prefill_from(saved);
    }

    if let Err(errors) = address.validate(&settings.rules) {
        return Ok(rejected(errors.iter().map(FieldProblem::from).collect()));
    }

    let verified = if settings.rules.enabled && settings.verify_address {
        match state
            .verifier()
            .verify_checkout(&address, settings.language)
            .await
        {
            Ok(VerificationOutcome::Verified) => Some(true),
            Ok(VerificationOutcome::NotFound) => {
                return Ok(rejected(vec![FieldProblem {
                    field: AddressField::BuildingNumber.form_key(),
                    message: NOT_VERIFIED.to_string(),
                }]));
            }
            // Blank numbers were already allowed by the rules above.
            Err(AddressError::Validation(ValidationError::Missing { .. })) => None,
            Err(AddressError::Validation(e)) => {
                let problem = CheckoutFieldError::from_validation(&e);
                return Ok(rejected(vec![FieldProblem::from(&problem)]));
            }
            Err(e) => {
                warn!(error = %e, "Checkout address verification unavailable");
                None
            }
        }
    } else {
        None
    };

    let entries = address.persistable_entries();
    let values = CheckoutValues {
        order_meta: entries
            .iter()
            .map(|(field, value)| (field.order_meta_key(), (*value).to_string()))
            .collect(),
        customer_meta: entries
            .iter()
            .map(|(field, value)| (field.form_key(), (*value).to_string()))
            .collect(),
        verified,
    };

    Ok(success(values).into_response())
}
