//! In-memory transport for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use encoding_rs::WINDOWS_1256;
use futures::FutureExt;
use futures::future::BoxFuture;
use url::Url;

use super::error::TransportError;
use super::transport::Transport;

/// Canned reply for one endpoint.
#[derive(Debug, Clone)]
enum Reply {
    Body(Vec<u8>),
    Fail(TransportError),
}

/// A [`Transport`] that answers from canned replies keyed by URL path suffix.
///
/// Requests to a path with no reply fail with HTTP 404. Every request is
/// counted and its URL recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Vec<(String, Reply)>,
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with raw body bytes for paths ending in `path_suffix`.
    #[must_use]
    pub fn respond(mut self, path_suffix: &str, body: Vec<u8>) -> Self {
        self.replies
            .push((path_suffix.to_string(), Reply::Body(body)));
        self
    }

    /// Reply with `json` encoded as windows-1256, the way the provider does.
    #[must_use]
    pub fn respond_json(self, path_suffix: &str, json: &str) -> Self {
        let (bytes, _, _) = WINDOWS_1256.encode(json);
        self.respond(path_suffix, bytes.into_owned())
    }

    /// Fail requests for paths ending in `path_suffix`.
    #[must_use]
    pub fn fail(mut self, path_suffix: &str, error: TransportError) -> Self {
        self.replies
            .push((path_suffix.to_string(), Reply::Fail(error)));
        self
    }

    /// Number of requests made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs requested so far, oldest first.
    pub fn requested_urls(&self) -> Vec<Url> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for MockTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, TransportError>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(url.clone());

            let reply = self
                .replies
                .iter()
                .find(|(suffix, _)| url.path().ends_with(suffix.as_str()))
                .map(|(_, reply)| reply.clone());

            match reply {
                Some(Reply::Body(body)) => Ok(body),
                Some(Reply::Fail(error)) => Err(error),
                None => Err(TransportError::Status(404)),
            }
        }
        .boxed()
    }
}
