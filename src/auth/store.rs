//! Session state owner.
//!
//! [`AuthState`] is written by the auth sub-client (probe, login, register,
//! logout) and by [`SessionStore`], the [`SessionHooks`] implementation the
//! HTTP layer reports refresh outcomes to. The store forwards those events
//! to an optional application listener (typically to redirect to sign-in).

use super::{Role, User};
use crate::http::session::{CredentialMarker, SessionHooks};

use async_lock::RwLock;
use async_trait::async_trait;
use std::sync::Arc;

/// Current session: who is signed in, and whether the credential is known valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub credential: Option<CredentialMarker>,
}

impl AuthState {
    pub fn role(&self) -> Role {
        self.user.as_ref().map(|u| u.role).unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub(crate) fn establish(&mut self, user: User) {
        self.user = Some(user);
        self.credential = Some(CredentialMarker::issued());
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.credential = None;
    }
}

/// Owns the shared [`AuthState`] and reacts to session-client events.
pub struct SessionStore {
    state: Arc<RwLock<AuthState>>,
    listener: Option<Arc<dyn SessionHooks>>,
}

impl SessionStore {
    pub fn new(state: Arc<RwLock<AuthState>>, listener: Option<Arc<dyn SessionHooks>>) -> Self {
        Self { state, listener }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SessionHooks for SessionStore {
    async fn on_credential_refreshed(&self, marker: CredentialMarker) {
        self.state.write().await.credential = Some(marker.clone());
        if let Some(listener) = &self.listener {
            listener.on_credential_refreshed(marker).await;
        }
    }

    async fn on_session_expired(&self) {
        tracing::warn!("session expired, clearing signed-in user");
        self.state.write().await.clear();
        if let Some(listener) = &self.listener {
            listener.on_session_expired().await;
        }
    }
}
