//! Scripted in-memory backend for unit tests of the HTTP layer.

use crate::error::HttpError;
use crate::http::session::{CredentialMarker, SessionHooks};
use crate::http::transport::{ApiRequest, RawResponse, Transport};
use crate::network::REFRESH_PATH;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Script {
    session_valid: bool,
    refresh_status: u16,
    refresh_delay: Option<Duration>,
    always_unauthorized: Vec<String>,
    fixed_status: HashMap<String, u16>,
    unreachable: Vec<String>,
    log: Vec<String>,
    retries: Vec<String>,
    refresh_calls: usize,
}

/// Answers 401 until a refresh succeeds, then echoes the path back.
pub(crate) struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub(crate) fn expired() -> Arc<Self> {
        Self::build(false)
    }

    pub(crate) fn valid() -> Arc<Self> {
        Self::build(true)
    }

    fn build(session_valid: bool) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                session_valid,
                refresh_status: 200,
                ..Script::default()
            }),
        })
    }

    pub(crate) fn with_refresh_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        self.script.lock().refresh_delay = Some(delay);
        self
    }

    pub(crate) fn with_refresh_status(self: Arc<Self>, status: u16) -> Arc<Self> {
        self.script.lock().refresh_status = status;
        self
    }

    pub(crate) fn with_forbidden_path(self: Arc<Self>, path: &str) -> Arc<Self> {
        self.script.lock().always_unauthorized.push(path.to_string());
        self
    }

    pub(crate) fn with_status(self: Arc<Self>, path: &str, status: u16) -> Arc<Self> {
        self.script.lock().fixed_status.insert(path.to_string(), status);
        self
    }

    /// Fail `path` at the transport level, as if the connection timed out.
    pub(crate) fn with_unreachable_path(self: Arc<Self>, path: &str) -> Arc<Self> {
        self.script.lock().unreachable.push(path.to_string());
        self
    }

    /// How many times `path` reached the transport.
    pub(crate) fn calls(&self, path: &str) -> usize {
        let suffix = format!(" {}", path);
        self.script
            .lock()
            .log
            .iter()
            .filter(|line| line.trim_end_matches(" (retry)").ends_with(&suffix))
            .count()
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.script.lock().refresh_calls
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.script.lock().log.clone()
    }

    pub(crate) fn retries(&self) -> Vec<String> {
        self.script.lock().retries.clone()
    }
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, HttpError> {
        if request.path == REFRESH_PATH {
            let delay = {
                let mut script = self.script.lock();
                script.refresh_calls += 1;
                script.log.push(format!("{} {}", request.method, request.path));
                script.refresh_delay
            };
            if let Some(d) = delay {
                futures_timer::Delay::new(d).await;
            }
            let mut script = self.script.lock();
            let status = script.refresh_status;
            if status == 200 {
                script.session_valid = true;
                return Ok(RawResponse::new(200, "{}"));
            }
            return Ok(RawResponse::new(status, r#"{"message":"Refresh token expired"}"#));
        }

        let mut script = self.script.lock();
        let suffix = if request.is_retry() { " (retry)" } else { "" };
        script
            .log
            .push(format!("{} {}{}", request.method, request.path, suffix));
        if request.is_retry() {
            script.retries.push(request.path.clone());
        }

        if script.unreachable.contains(&request.path) {
            return Err(HttpError::Timeout);
        }
        if !script.session_valid || script.always_unauthorized.contains(&request.path) {
            return Ok(RawResponse::new(401, r#"{"message":"Token expired"}"#));
        }
        if let Some(status) = script.fixed_status.get(&request.path) {
            return Ok(RawResponse::new(*status, r#"{"message":"Rejected"}"#));
        }
        Ok(RawResponse::new(
            200,
            serde_json::json!({ "path": request.path }).to_string(),
        ))
    }
}

/// Counts hook invocations.
#[derive(Default)]
pub(crate) struct RecordingHooks {
    refreshed: AtomicUsize,
    expired: AtomicUsize,
}

impl RecordingHooks {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn refreshed(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }

    pub(crate) fn expired(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHooks for RecordingHooks {
    async fn on_credential_refreshed(&self, _marker: CredentialMarker) {
        self.refreshed.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}
