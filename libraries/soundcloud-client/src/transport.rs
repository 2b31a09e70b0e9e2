//! Network transport boundary.

use crate::config::ClientConfig;
use crate::error::{Result, SdkError, TransportError};
use crate::request::{HttpMethod, RequestDescriptor};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests.
///
/// Implementations resolve exactly once per call with either a response or a
/// transport error. Timeouts, redirects and TLS are the implementation's
/// concern. Dropping the returned future must cancel the call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport using the timeouts and user agent from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SdkError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// Wrap an existing client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError> {
        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, request.url().clone());
        if let (Some(body), Some(content_type)) = (request.body(), request.content_type()) {
            builder = builder
                .header(CONTENT_TYPE, content_type)
                .body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        debug!(status, size = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::connect(e.to_string())
    } else {
        TransportError::other(e.to_string())
    }
}
