//! # CourseHub SDK
//!
//! A Rust client for the CourseHub education platform supporting both native
//! and WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Domain types: courses, enrollments, users, roles (always available)
//! 2. **Auth**: Session state, login/register/logout, access guards
//! 3. **HTTP API**: `CourseHubHttp` with single-flight session refresh and retry policies
//! 4. **High-Level Client**: `CourseHubClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coursehub_sdk::prelude::*;
//!
//! let client = CourseHubClient::builder()
//!     .base_url("http://localhost:4000/api")
//!     .build()?;
//!
//! client.auth().check_session().await;
//! let courses = client.courses().search("rust").await?;
//! ```
//!
//! ## Session Recovery
//!
//! The backend issues short-lived session cookies. When any call gets a 401,
//! the SDK performs one `POST /auth/refresh` no matter how many calls failed
//! concurrently, then replays each of them once, in the order they failed. If
//! the refresh fails, every waiting call fails with the refresh error and the
//! session is cleared.

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: user profile, session state, access guards.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with session recovery and retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CourseHubClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Domain types
    pub use crate::domain::course::{Course, CourseInput};
    pub use crate::domain::enrollment::Enrollment;

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError};

    // Network
    pub use crate::network::{API_URL_ENV, DEFAULT_API_URL};

    // Auth + guards
    pub use crate::auth::guard::{guest_only, require_session, Access, Redirect};
    pub use crate::auth::{Role, User};
    #[cfg(feature = "http")]
    pub use crate::auth::store::AuthState;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, CourseHubClient, CourseHubClientBuilder, CoursesClient, EnrollmentsClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{
        CourseHubHttp, CredentialMarker, RequestOptions, RetryConfig, RetryPolicy, SessionHooks,
        Transport,
    };
}
