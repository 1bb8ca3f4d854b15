//! Saudi national address service library.
//!
//! Exposes the national address client, the checkout verifier and the HTTP
//! API as a library so they can be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod national_address;
pub mod nonce;
pub mod routes;
pub mod state;
pub mod verifier;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not contact the provider.
async fn health() -> &'static str {
    "ok"
}
