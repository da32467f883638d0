//! Transport seam between the session client and the network.
//!
//! The session client never touches sockets directly: it hands an
//! [`ApiRequest`] to a [`Transport`] and interprets the [`RawResponse`].
//! [`ReqwestTransport`] is the production implementation; tests plug in an
//! in-memory backend.

use crate::error::HttpError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

/// An outbound API call, relative to the configured base URL.
///
/// The body is kept as a JSON value so the same request can be replayed
/// after a session refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub(crate) retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retried: false,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Whether this is the single replay issued after a session refresh.
    pub fn is_retry(&self) -> bool {
        self.retried
    }
}

/// Status, body and rate-limit hint of a backend answer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    /// `Retry-After` header, in seconds.
    pub retry_after_secs: Option<u64>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after_secs: None,
        }
    }
}

/// Sends one request and returns whatever the backend answered.
///
/// Implementations must attach session credentials and must not interpret
/// status codes; a 401 is a successful transport round-trip.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, HttpError>;
}

/// `reqwest`-backed transport.
///
/// - Native: keeps an in-process cookie store, so the HTTP-only session
///   cookie set by `/auth/login` or `/auth/refresh` is replayed automatically.
/// - WASM: uses `credentials: include` and lets the browser own the cookie.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.cookie_store(true).pool_max_idle_per_host(10);
            if let Some(t) = timeout {
                builder = builder.timeout(t);
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, HttpError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut req = self.client.request(request.method.clone(), &url);

        #[cfg(target_arch = "wasm32")]
        {
            req = req.fetch_credentials_include();
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = resp.text().await.unwrap_or_default();

        Ok(RawResponse {
            status,
            body,
            retry_after_secs,
        })
    }
}
