//! Network transport used to hand events to the remote collector.

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::event::TelemetryEvent;

/// A single failed delivery attempt.
///
/// Never leaves the telemetry client; it only feeds the retry policy and the
/// local diagnostics.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("collector responded with HTTP {0}")]
    Status(StatusCode),
}

/// Body returned by the collector for an accepted event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectorAck {
    #[serde(rename = "logID")]
    pub log_id: Option<String>,
    pub message: Option<String>,
}

/// Performs one delivery attempt.
///
/// # Implementations
///
/// - [`HttpTransport`] - JSON `POST` to `<collector>/logs`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `event`, attaching `token` as a bearer credential when present.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connection failures and non-2xx responses.
    async fn post(
        &self,
        event: &TelemetryEvent,
        token: Option<String>,
    ) -> Result<CollectorAck, TransportError>;
}

/// [`Transport`] speaking JSON over HTTP with `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport posting to `<base_url>/logs`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("quicklink/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/logs", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        event: &TelemetryEvent,
        token: Option<String>,
    ) -> Result<CollectorAck, TransportError> {
        let mut request = self.client.post(&self.endpoint).json(event);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        // The event is accepted at this point; an unreadable body must not
        // cause a re-send.
        Ok(response.json::<CollectorAck>().await.unwrap_or_default())
    }
}
