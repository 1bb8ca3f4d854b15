//! Public checkout settings for the storefront script.

use axum::{Json, extract::State};
use saudi_address_core::{FieldVisibility, Language};
use serde::Serialize;

use crate::error::{Envelope, success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicSettings {
    pub enabled: bool,
    pub required: bool,
    pub language: Language,
    pub verify_address: bool,
    pub api_configured: bool,
    pub fields: FieldVisibility,
}

/// `GET /api/settings`
pub async fn settings(State(state): State<AppState>) -> Json<Envelope<PublicSettings>> {
    let checkout = state.config().checkout;

    success(PublicSettings {
        enabled: checkout.rules.enabled,
        required: checkout.rules.required,
        language: checkout.language,
        verify_address: checkout.verify_address,
        api_configured: state.client().is_configured(),
        fields: checkout.rules.visibility,
    })
}
