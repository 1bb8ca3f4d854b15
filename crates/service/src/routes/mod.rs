//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /api/settings           - Public checkout settings
//! POST /api/nonce              - Issue a checkout (or, with bearer token, admin) nonce
//!
//! # Lookups (checkout nonce)
//! POST /api/regions            - Regions
//! POST /api/cities             - Cities of a region (-1 for all)
//! POST /api/districts          - Districts of a city
//! POST /api/verify             - Verify building number / postal code
//! POST /api/checkout/validate  - Validate submitted checkout fields
//!
//! # Admin (bearer token + admin nonce)
//! POST /api/admin/test         - Provider connectivity test
//! ```

pub mod admin;
pub mod checkout;
pub mod form;
pub mod lookup;
pub mod nonce;
pub mod settings;
pub mod verify;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront-facing API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(settings::settings))
        .route("/nonce", post(nonce::issue))
        .route("/regions", post(lookup::regions))
        .route("/cities", post(lookup::cities))
        .route("/districts", post(lookup::districts))
        .route("/verify", post(verify::verify))
        .route("/checkout/validate", post(checkout::validate))
}

/// Create the admin API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/test", post(admin::test_connection))
}

/// Create the combined router.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes().nest("/admin", admin_routes()))
}
