//! Authentication: user profile, roles, login/register/logout, session state.
//!
//! ## Session Model
//!
//! The backend keeps the session in an HTTP-only cookie. The SDK never reads
//! or stores a token:
//!
//! - **WASM/Browser**: the browser owns the cookie; requests use
//!   `credentials: include`.
//! - **Native**: the transport keeps a private cookie store.
//!
//! What the SDK does own is the *session state*: the signed-in [`User`] and
//! an opaque credential marker. It is written only by `check_session`,
//! `login`, `register`, `logout`, and the session-expiry hook.
//!
//! ## Session Hydration
//!
//! Call `client.auth().check_session()` once at startup. A failed probe means
//! "no active session", not an error.

#[cfg(feature = "http")]
pub mod client;

pub mod guard;

#[cfg(feature = "http")]
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// User profile types
// ============================================================================

/// Role of the signed-in user. Absence of a session is [`Role::Guest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    #[default]
    #[serde(other)]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Guest => "guest",
        }
    }

    /// Human-readable label ("Admin", "Student", "Guest").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
            Self::Guest => "Guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform user profile as returned by `/auth/me`, `/auth/login`, `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Wire types
// ============================================================================

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Envelope shared by `/auth/me`, `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}
