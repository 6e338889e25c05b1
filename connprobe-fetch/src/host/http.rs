//! Outbound HTTP with a bounded timeout.
//!
//! Every HTTP-based probe goes through [`HttpClient::execute`], which sends
//! exactly one request and reports the downstream answer without
//! interpreting it: the status code is copied into the outcome and the body
//! is returned as `Body: <body>`.

use std::time::Duration;

use connprobe_core::{ProbeError, ProbeOutcome};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::HttpError;

/// Default end-to-end request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// User agent string for connprobe.
const USER_AGENT: &str = concat!("connprobe/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with a fixed end-to-end timeout and tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with the default 20 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This should only occur
    /// if the system's TLS/SSL configuration is fundamentally broken,
    /// making network operations impossible. Use [`HttpClient::try_with_timeout`]
    /// to handle that case.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::try_with_timeout(timeout).unwrap_or_else(|e| {
            panic!(
                "Failed to create HTTP client: {e}. \
                This usually indicates a broken TLS/SSL configuration."
            )
        })
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn try_with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, timeout })
    }

    /// The end-to-end timeout applied to every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts a request with the given method.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Starts a GET request.
    pub fn get(&self, url: Url) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Sends a request and returns the raw response.
    ///
    /// Unlike [`HttpClient::execute`], callers interpret the status themselves.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Request`] on transport failure or timeout.
    #[instrument(skip_all)]
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, HttpError> {
        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "Response received");
        Ok(response)
    }

    /// Sends a request and reports the downstream answer verbatim.
    ///
    /// - transport failure: `500 Request Error: <err>`
    /// - body read failure: `500 Read Body Error: <err>`
    /// - otherwise: `<downstream status> Body: <body>`
    #[instrument(skip_all)]
    pub async fn execute(&self, request: RequestBuilder) -> ProbeOutcome {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Outbound request failed");
                return ProbeError::transport("Request", e).into();
            }
        };

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Response received");

        match response.text().await {
            Ok(body) => ProbeOutcome::pass_through(status.as_u16(), &body),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                ProbeError::transport("Read Body", e).into()
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let client = HttpClient::new();
        assert_eq!(client.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_custom_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(3));
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_execute_transport_failure() {
        // Port 9 on localhost is the discard service; nothing listens there in CI.
        let client = HttpClient::with_timeout(Duration::from_secs(2));
        let url = Url::parse("http://127.0.0.1:9/").unwrap();

        let outcome = client.execute(client.get(url)).await;

        assert_eq!(outcome.status_code, 500);
        assert!(outcome.message.starts_with("Request Error: "), "{}", outcome.message);
    }
}
