//! Integration tests for the Saudi national address service.
//!
//! The service router is driven in-process with `tower::ServiceExt::oneshot`;
//! the national address API is replaced by an in-memory transport, so no
//! network or API key is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p saudi-address-integration-tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use saudi_address_core::{CheckoutRules, Language};
use saudi_address_service::config::{CheckoutSettings, NationalAddressConfig, ServiceConfig};
use saudi_address_service::national_address::NationalAddressClient;
use saudi_address_service::national_address::testing::MockTransport;
use saudi_address_service::nonce::NonceAction;
use saudi_address_service::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// Admin bearer token used by every test context.
pub const ADMIN_TOKEN: &str = "Zq8!vR2#kL5@xN9$wT3%mB7^cF1&hJ4*";

const NONCE_SECRET: &str = "pX4@nM8!qW2#zK6$rT9%vB3^yH7&cL1*";

/// A service wired to an in-memory provider.
pub struct TestContext {
    pub transport: Arc<MockTransport>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Context with default checkout settings and API key `K`.
    #[must_use]
    pub fn new(transport: MockTransport) -> Self {
        Self::with_settings(transport, "K", CheckoutSettings::default())
    }

    /// Context with an explicit API key and checkout settings.
    #[must_use]
    pub fn with_settings(transport: MockTransport, api_key: &str, checkout: CheckoutSettings) -> Self {
        let national_address =
            NationalAddressConfig::new("https://api.example/v3", SecretString::from(api_key));
        let config = ServiceConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            nonce_secret: SecretString::from(NONCE_SECRET),
            nonce_ttl: Duration::from_secs(3600),
            admin_token: SecretString::from(ADMIN_TOKEN),
            national_address: national_address.clone(),
            checkout,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let transport = Arc::new(transport);
        let client = NationalAddressClient::with_transport(&national_address, transport.clone());
        let state = AppState::with_client(config, client);

        Self {
            transport,
            app: saudi_address_service::app(state.clone()),
            state,
        }
    }

    /// A valid nonce for `action`.
    ///
    /// # Panics
    ///
    /// Panics if the system clock is before the Unix epoch.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn nonce(&self, action: NonceAction) -> String {
        self.state.nonces().issue(action).expect("nonce")
    }

    /// POST a JSON body and return status and parsed JSON reply.
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.send(path, body, None).await
    }

    /// POST a JSON body with a bearer token.
    pub async fn post_as_admin(&self, path: &str, body: &Value, token: &str) -> (StatusCode, Value) {
        self.send(path, body, Some(token)).await
    }

    /// GET a path and return status and raw body text.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body is not UTF-8.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::get(path).body(Body::empty()).expect("request");
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    #[allow(clippy::expect_used)]
    async fn send(&self, path: &str, body: &Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

/// Checkout settings with verification switched on.
#[must_use]
pub fn verifying_checkout() -> CheckoutSettings {
    CheckoutSettings {
        language: Language::Arabic,
        verify_address: true,
        rules: CheckoutRules::default(),
    }
}
