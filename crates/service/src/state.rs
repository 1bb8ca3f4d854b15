//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::national_address::{AddressError, NationalAddressClient};
use crate::nonce::{NonceAction, NonceIssuer};
use crate::verifier::AddressVerifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the one national address client the
/// process uses.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    client: NationalAddressClient,
    verifier: AddressVerifier,
    nonces: NonceIssuer,
}

impl AppState {
    /// Create the application state with an HTTP-backed client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, AddressError> {
        let client = NationalAddressClient::new(&config.national_address)?;
        Ok(Self::with_client(config, client))
    }

    /// Create the application state around an existing client.
    #[must_use]
    pub fn with_client(config: ServiceConfig, client: NationalAddressClient) -> Self {
        let verifier = AddressVerifier::new(client.clone());
        let nonces = NonceIssuer::new(config.nonce_secret.clone(), config.nonce_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                verifier,
                nonces,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Get a reference to the national address client.
    #[must_use]
    pub fn client(&self) -> &NationalAddressClient {
        &self.inner.client
    }

    /// Get a reference to the address verifier.
    #[must_use]
    pub fn verifier(&self) -> &AddressVerifier {
        &self.inner.verifier
    }

    /// Get a reference to the nonce issuer.
    #[must_use]
    pub fn nonces(&self) -> &NonceIssuer {
        &self.inner.nonces
    }

    /// Reject the request unless `nonce` is valid for `action`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Nonce`] when the nonce does not verify.
    pub fn check_nonce(&self, action: NonceAction, nonce: &str) -> Result<(), AppError> {
        self.inner.nonces.verify(action, nonce).map_err(|e| {
            tracing::warn!(action = action.name(), error = %e, "Nonce check failed");
            AppError::Nonce(e)
        })
    }
}
