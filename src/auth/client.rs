//! Auth sub-client: session probe, login, registration, logout.

use crate::auth::guard::{self, Access};
use crate::auth::store::AuthState;
use crate::auth::{LoginRequest, RegisterRequest, Role, User, UserEnvelope};
use crate::client::CourseHubClient;
use crate::error::{AuthError, HttpError, SdkError};
use crate::http::{Method, RequestOptions};

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a CourseHubClient,
}

impl<'a> Auth<'a> {
    /// Probe the backend for an existing session (`GET /auth/me`).
    ///
    /// Run once at startup. Any failure is treated as "no active session":
    /// the local state is cleared and `None` is returned.
    pub async fn check_session(&self) -> Option<User> {
        match self
            .client
            .http
            .get::<UserEnvelope>("/auth/me", RequestOptions::default())
            .await
        {
            Ok(me) => {
                self.client
                    .auth_state
                    .write()
                    .await
                    .establish(me.user.clone());
                Some(me.user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "no active session");
                self.client.auth_state.write().await.clear();
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// On failure the error carries the backend's message, or
    /// `"Login failed"` when it sent none.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SdkError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: UserEnvelope = self
            .client
            .http
            .request(
                Method::POST,
                "/auth/login",
                Some(&request),
                RequestOptions::default().skip_recovery(),
            )
            .await
            .map_err(|e| AuthError::LoginFailed(failure_message(&e, "Login failed")))?;

        self.client
            .auth_state
            .write()
            .await
            .establish(resp.user.clone());
        tracing::info!(user_id = %resp.user.id, "signed in");
        Ok(resp.user)
    }

    /// Create an account and sign in as it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SdkError> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: UserEnvelope = self
            .client
            .http
            .request(
                Method::POST,
                "/auth/register",
                Some(&request),
                RequestOptions::default().skip_recovery(),
            )
            .await
            .map_err(|e| AuthError::RegisterFailed(failure_message(&e, "Register failed")))?;

        self.client
            .auth_state
            .write()
            .await
            .establish(resp.user.clone());
        tracing::info!(user_id = %resp.user.id, "registered");
        Ok(resp.user)
    }

    /// Sign out. The server call is best-effort; local state is always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .http
            .post::<serde_json::Value, _>("/auth/logout", &serde_json::json!({}))
            .await
        {
            tracing::debug!(error = %e, "logout call failed, clearing local session anyway");
        }
        self.client.auth_state.write().await.clear();
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> AuthState {
        self.client.auth_state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.client.auth_state.read().await.user.clone()
    }

    pub async fn role(&self) -> Role {
        self.client.auth_state.read().await.role()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.auth_state.read().await.is_authenticated()
    }

    /// The signed-in user, or [`AuthError::NotAuthenticated`].
    pub async fn require_user(&self) -> Result<User, SdkError> {
        self.user()
            .await
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Access decision for a view that needs a session (and optionally a role).
    pub async fn access(&self, role: Option<Role>) -> Access {
        let state = self.client.auth_state.read().await;
        guard::require_session(state.user.as_ref(), role)
    }
}

fn failure_message(error: &HttpError, fallback: &str) -> String {
    error
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
