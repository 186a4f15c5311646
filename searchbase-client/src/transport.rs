//! HTTP transport abstraction.
//!
//! The client never talks to a networking stack directly; it goes through the
//! [`HttpTransport`] capability trait. Production code uses
//! [`ReqwestTransport`]; tests inject a scripted implementation.
//!
//! The transport is responsible only for moving bytes: it sends one POST with
//! the JSON body and the credential header, and hands back whatever status
//! and body the server produced. Status interpretation, body decoding, and
//! retry policy (there is none here) belong to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::{BoxError, ClientError};

/// Header carrying the client credential on every request.
pub const TOKEN_HEADER: &str = "x-searchbase-token";

/// A raw HTTP response: status code plus body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Capability trait for sending search requests over HTTP.
///
/// Implementations must be cheap to call concurrently; the client issues no
/// more than one in-flight request per `search`/`search_all` invocation, but
/// invocations may run in parallel on the same client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body to `url` with the credential `token`.
    ///
    /// Returns the response status and body for any HTTP-level outcome,
    /// including error statuses. Fails only when no response was obtained
    /// (connection failure, timeout, interrupted body read).
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> std::result::Result<HttpResponse, BoxError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> std::result::Result<HttpResponse, BoxError> {
        (**self).post_json(url, token, body).await
    }
}

/// Default [`HttpTransport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default timeouts (5s connect, 30s request).
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Create a transport with explicit connect and request timeouts.
    pub fn with_timeouts(
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing [`reqwest::Client`].
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> std::result::Result<HttpResponse, BoxError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, token)
            .body(body)
            .send()
            .await
            .map_err(|e| Box::new(e) as BoxError)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Box::new(e) as BoxError)?;

        Ok(HttpResponse { status, body })
    }
}
