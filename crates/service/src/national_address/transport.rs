//! HTTP transport seam for the national address client.
//!
//! The client only needs "GET this URL, give me the body bytes". Keeping that
//! behind a trait lets tests substitute an in-memory transport and count
//! calls.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use tracing::warn;
use url::Url;

use super::error::TransportError;

/// User agent sent with every provider request.
pub const USER_AGENT: &str = concat!("saudi-address/", env!("CARGO_PKG_VERSION"));

/// Performs a single GET and returns the raw response body.
///
/// Implementations must not retry and must treat a non-success status as an
/// error.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, TransportError>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, TransportError>> {
        async move {
            let response = self.client.get(url.clone()).send().await?;

            let status = response.status();
            if !status.is_success() {
                warn!(
                    status = %status,
                    path = url.path(),
                    "National address API returned non-success status"
                );
                return Err(TransportError::Status(status.as_u16()));
            }

            let body = response.bytes().await?;
            Ok(body.to_vec())
        }
        .boxed()
    }
}
