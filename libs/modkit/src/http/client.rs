//! Traced HTTP client that injects trace context into outgoing requests.

use crate::http::trace_context;
use std::time::Duration;
use tracing::{field::Empty, Instrument, Level};

/// A reqwest wrapper that opens an `outgoing_http` span per request and
/// propagates a `traceparent` header.
#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Client whose requests fail once `timeout` elapses (connect + body).
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(inner))
    }

    /// Execute a built reqwest::Request, injecting trace headers from the current span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = Empty,
            trace_id = Empty,
            error = Empty,
            otel.kind = "client",
        );

        trace_context::inject_trace_context(req.headers_mut(), &span);

        let response = self
            .inner
            .execute(req)
            .instrument(span.clone())
            .await
            .inspect_err(|_| {
                span.record("error", true);
            })?;

        span.record("http.status_code", response.status().as_u16());
        if response.status().is_client_error() || response.status().is_server_error() {
            span.record("error", true);
        }

        Ok(response)
    }

    /// Convenience method for GET requests
    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let req = self.inner.get(url).build()?;
        self.execute(req).await
    }

    /// Get a reference to the underlying reqwest::Client for advanced usage
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
