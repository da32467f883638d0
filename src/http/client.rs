//! Low-level HTTP client: `CourseHubHttp`.
//!
//! Every call goes through [`CourseHubHttp::request`], which layers three
//! concerns on top of the [`Transport`]:
//!
//! 1. Status mapping: raw status + body → JSON value or [`HttpError`].
//! 2. Transient retries, only when the caller opts in with a [`RetryPolicy`]
//!    (never for 401). By default every non-401 failure passes through
//!    unchanged after a single attempt.
//! 3. Session recovery: a first-time 401 triggers one shared refresh, after
//!    which the request is replayed exactly once.
//!
//! Internal to the SDK's sub-clients, but public for calling endpoints the
//! SDK does not wrap.

use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::http::session::{CredentialMarker, RefreshCoordinator, SessionHooks, Ticket};
use crate::http::transport::{ApiRequest, RawResponse, Transport};
use crate::network::REFRESH_PATH;

use futures::future::{self, Either};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on the refresh call and on time spent queued behind it.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// Defaults to [`RetryPolicy::None`]: one attempt, failures pass through.
    pub retry: RetryPolicy,
    /// Treat a 401 as final instead of refreshing the session.
    pub skip_recovery: bool,
}

impl RequestOptions {
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// For credential checks (login, register), where a 401 means "wrong
    /// credentials" rather than "session expired".
    pub fn skip_recovery(mut self) -> Self {
        self.skip_recovery = true;
        self
    }
}

/// Low-level HTTP client for the CourseHub REST API.
#[derive(Clone)]
pub struct CourseHubHttp {
    transport: Arc<dyn Transport>,
    hooks: Arc<dyn SessionHooks>,
    refresh: Arc<RefreshCoordinator>,
    refresh_timeout: Option<Duration>,
}

impl CourseHubHttp {
    pub fn new(transport: Arc<dyn Transport>, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            transport,
            hooks,
            refresh: Arc::new(RefreshCoordinator::new()),
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
        }
    }

    /// Bound the refresh call and queued waiters. `None` waits forever.
    pub fn with_refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Whether a session refresh is currently outstanding.
    pub fn refresh_in_progress(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Number of requests parked behind the in-flight refresh.
    pub fn queued_requests(&self) -> usize {
        self.refresh.pending()
    }

    // ── Public request surface ───────────────────────────────────────────

    /// Issue `method path` with an optional JSON body.
    ///
    /// Credentials are always attached. A first-time 401 is recovered
    /// transparently; the caller only sees the final outcome.
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        let retry = options.retry;
        let mut request = ApiRequest::new(method, path).with_query(options.query);
        if let Some(b) = body {
            request = request.with_body(serde_json::to_value(b)?);
        }
        let value = if options.skip_recovery {
            self.send_with_retry(&request, &retry).await?
        } else {
            self.execute(request, &retry).await?
        };
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        self.request(Method::GET, path, None::<&()>, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.request(Method::DELETE, path, None::<&()>, RequestOptions::default())
            .await
    }

    // ── Session recovery ─────────────────────────────────────────────────

    pub(crate) async fn execute(
        &self,
        request: ApiRequest,
        retry: &RetryPolicy,
    ) -> Result<serde_json::Value, HttpError> {
        match self.send_with_retry(&request, retry).await {
            Err(e) if e.is_unauthorized() && !request.retried => {
                tracing::debug!(path = %request.path, "401 received, recovering session");
                self.recover(request, retry).await
            }
            other => other,
        }
    }

    async fn recover(
        &self,
        mut request: ApiRequest,
        retry: &RetryPolicy,
    ) -> Result<serde_json::Value, HttpError> {
        request.retried = true;

        match self.refresh.acquire() {
            Ticket::Wait(rx) => match with_timeout(rx, self.refresh_timeout).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(cause))) => return Err(HttpError::RefreshFailed(cause)),
                Ok(Err(_canceled)) => {
                    return Err(HttpError::RefreshFailed(Arc::new(
                        HttpError::RefreshAbandoned,
                    )))
                }
                Err(timeout) => return Err(HttpError::RefreshFailed(Arc::new(timeout))),
            },
            Ticket::Lead(lease) => match self.refresh_session().await {
                Ok(()) => {
                    tracing::info!("session refreshed");
                    self.hooks
                        .on_credential_refreshed(CredentialMarker::issued())
                        .await;
                    lease.settle(Ok(()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "session refresh failed, signing out");
                    let cause = Arc::new(e);
                    lease.settle(Err(cause.clone()));
                    self.hooks.on_session_expired().await;
                    return Err(HttpError::RefreshFailed(cause));
                }
            },
        }

        tracing::debug!(path = %request.path, "replaying request after refresh");
        self.send_with_retry(&request, retry).await
    }

    async fn refresh_session(&self) -> Result<(), HttpError> {
        let request = ApiRequest::new(Method::POST, REFRESH_PATH).with_body(serde_json::json!({}));
        let raw = with_timeout(self.transport.send(&request), self.refresh_timeout).await??;
        interpret(raw).map(|_| ())
    }

    // ── Transport + retries ──────────────────────────────────────────────

    async fn send_with_retry(
        &self,
        request: &ApiRequest,
        retry: &RetryPolicy,
    ) -> Result<serde_json::Value, HttpError> {
        let RetryPolicy::Backoff(config) = retry else {
            return self.do_request(request).await;
        };

        let mut attempt = 0;
        loop {
            match self.do_request(request).await {
                Err(e) if attempt < config.max_retries && config.is_retryable(&e) => {
                    let delay = config.delay_for(attempt, &e);
                    tracing::debug!(
                        path = %request.path,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying transient failure"
                    );
                    futures_timer::Delay::new(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn do_request(&self, request: &ApiRequest) -> Result<serde_json::Value, HttpError> {
        let raw = self.transport.send(request).await?;
        interpret(raw)
    }
}

/// Map a raw backend answer onto the SDK's error taxonomy.
pub(crate) fn interpret(raw: RawResponse) -> Result<serde_json::Value, HttpError> {
    if (200..300).contains(&raw.status) {
        if raw.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        return Ok(serde_json::from_str(&raw.body)?);
    }

    let status = raw.status;
    let message = error_message(status, &raw.body);

    Err(match status {
        401 => HttpError::Unauthorized { message },
        403 => HttpError::Forbidden { message },
        404 => HttpError::NotFound(message),
        429 => HttpError::RateLimited {
            retry_after_ms: raw.retry_after_secs.map(|s| s * 1000),
        },
        400..=499 => HttpError::BadRequest { status, message },
        _ => HttpError::ServerError { status, message },
    })
}

/// The backend's `message` field when present, else the raw body, else a
/// generic line.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}

async fn with_timeout<F: Future>(fut: F, limit: Option<Duration>) -> Result<F::Output, HttpError> {
    let Some(limit) = limit else {
        return Ok(fut.await);
    };
    futures::pin_mut!(fut);
    match future::select(fut, futures_timer::Delay::new(limit)).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(HttpError::Timeout),
    }
}
