//! High-level client: `CourseHubClient` with nested sub-client accessors.
//!
//! This is the composition root: the builder constructs the transport, the
//! session store, and the HTTP layer, and wires the store in as the HTTP
//! layer's session hooks.

use crate::auth::client::Auth;
use crate::auth::store::{AuthState, SessionStore};
use crate::domain::course::client::Courses;
use crate::domain::enrollment::client::Enrollments;
use crate::error::SdkError;
use crate::http::{CourseHubHttp, ReqwestTransport, SessionHooks, Transport, DEFAULT_REFRESH_TIMEOUT};
use crate::network::{API_URL_ENV, DEFAULT_API_URL};

use async_lock::RwLock;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::course::client::Courses as CoursesClient;
pub use crate::domain::enrollment::client::Enrollments as EnrollmentsClient;

/// The primary entry point for the CourseHub SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.auth()`, `client.courses()`, `client.enrollments()`.
#[derive(Clone)]
pub struct CourseHubClient {
    pub(crate) http: CourseHubHttp,
    /// Session state, written only by the auth sub-client and the session store.
    pub(crate) auth_state: Arc<RwLock<AuthState>>,
}

impl CourseHubClient {
    pub fn builder() -> CourseHubClientBuilder {
        CourseHubClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn courses(&self) -> Courses<'_> {
        Courses { client: self }
    }

    pub fn enrollments(&self) -> Enrollments<'_> {
        Enrollments { client: self }
    }

    /// The underlying session client, for endpoints without a typed wrapper.
    pub fn http(&self) -> &CourseHubHttp {
        &self.http
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CourseHubClientBuilder {
    base_url: String,
    request_timeout: Option<Duration>,
    refresh_timeout: Option<Duration>,
    hooks: Option<Arc<dyn SessionHooks>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for CourseHubClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
            hooks: None,
            transport: None,
        }
    }
}

impl CourseHubClientBuilder {
    /// Start from the environment: `COURSEHUB_API_URL` overrides the base URL.
    pub fn from_env() -> Self {
        let builder = Self::default();
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => builder.base_url(url.trim()),
            _ => builder,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Bound on the refresh call and on requests queued behind it.
    pub fn refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Application listener for session events, e.g. redirect to sign-in on expiry.
    pub fn session_hooks(mut self, hooks: Arc<dyn SessionHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Replace the `reqwest` transport (tests, custom networking).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn configured_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build(self) -> Result<CourseHubClient, SdkError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(&self.base_url, self.request_timeout)?),
        };

        let auth_state = Arc::new(RwLock::new(AuthState::default()));
        let store = SessionStore::new(auth_state.clone(), self.hooks);
        let http = CourseHubHttp::new(transport, Arc::new(store))
            .with_refresh_timeout(self.refresh_timeout);

        tracing::debug!(base_url = %self.base_url, "CourseHub client built");
        Ok(CourseHubClient { http, auth_state })
    }
}
