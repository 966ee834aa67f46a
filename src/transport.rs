//! The outbound HTTP seam.
//!
//! [`Transport`] is the only thing the client talks to. [`HttpTransport`] is
//! the production implementation on top of `reqwest`; tests swap in their own.

use crate::{request::RequestDescriptor, Error, Response, Result};
use async_trait::async_trait;
use http::{header, HeaderMap, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// The WebMerge host every client talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://www.webmerge.me";

/// Sends request descriptors and returns decoded 2xx responses.
///
/// Implementations must surface non-2xx responses as [`Error::HttpError`]
/// and must not retry. One call to `send` is one request on the wire.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: RequestDescriptor) -> Result<Response<Value>>;
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// The API key.
    pub username: String,
    /// The API secret.
    pub password: String,
    /// Send credentials with the first request instead of waiting for a
    /// `401` challenge.
    pub send_immediately: bool,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("send_immediately", &self.send_immediately)
            .finish()
    }
}

/// Everything an [`HttpTransport`] is configured with. Fixed after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub base_url: Url,
    pub auth: BasicAuth,
    /// Decode response bodies as JSON. When off, bodies come back as a JSON
    /// string holding the raw text.
    pub json: bool,
    pub timeout: Option<Duration>,
    pub default_headers: HeaderMap,
}

/// [`Transport`] backed by a single `reqwest::Client`.
pub struct HttpTransport {
    http_client: reqwest::Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Builds the underlying HTTP client. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the HTTP client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("webmerge-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(config.default_headers.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// The configuration this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn url_for(&self, request: &RequestDescriptor) -> Url {
        let mut url = self.config.base_url.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), request.path);
        url.set_path(&path);

        if let Some(query) = request.query.as_ref().filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        url
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        url: Url,
        authenticate: bool,
    ) -> Result<reqwest::Response> {
        let mut builder = self.http_client.request(request.method.clone(), url);

        if authenticate {
            builder = builder.basic_auth(&self.config.auth.username, Some(&self.config.auth.password));
        }
        if self.config.json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(Error::from_transport)
    }

    async fn parse_response(
        &self,
        response: reqwest::Response,
        latency: Duration,
    ) -> Result<Response<Value>> {
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if !status.is_success() {
            let raw_response = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error response body"
                    );
                    String::new()
                }
            };

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            return Err(Error::HttpError {
                status,
                raw_response,
                headers,
            });
        }

        let raw_body = response.text().await.map_err(Error::from_transport)?;

        if !self.config.json {
            let data = Value::String(raw_body.clone());
            return Ok(Response::new(data, raw_body, status, headers, latency));
        }

        if raw_body.trim().is_empty() {
            return Ok(Response::new(Value::Null, raw_body, status, headers, latency));
        }

        match serde_json::from_str::<Value>(&raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<Response<Value>> {
        let url = self.url_for(&request);

        tracing::debug!(
            method = %request.method,
            url = %url,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let send_immediately = self.config.auth.send_immediately;
        let mut response = self.execute(&request, url.clone(), send_immediately).await?;

        if !send_immediately && is_basic_challenge(&response) {
            tracing::debug!(url = %url, "Answering basic auth challenge");
            response = self.execute(&request, url, true).await?;
        }

        self.parse_response(response, start_time.elapsed()).await
    }
}

fn is_basic_challenge(response: &reqwest::Response) -> bool {
    response.status() == StatusCode::UNAUTHORIZED
        && response
            .headers()
            .get_all(header::WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.trim_start().to_ascii_lowercase().starts_with("basic"))
}
