//! Unified SDK error types.

use std::sync::Arc;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Message suitable for inline display next to the failed action.
    ///
    /// Prefers the backend's own `message` and falls back to a generic text.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Http(e) => e
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            SdkError::Auth(AuthError::LoginFailed(msg))
            | SdkError::Auth(AuthError::RegisterFailed(msg)) => msg.clone(),
            SdkError::Auth(e) => e.to_string(),
            SdkError::Validation(msg) | SdkError::Other(msg) => msg.clone(),
            SdkError::Serde(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

const GENERIC_MESSAGE: &str = "Something went wrong.";

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Timeout")]
    Timeout,

    /// The session refresh failed; every request waiting on it fails with the same cause.
    #[error("Session refresh failed: {0}")]
    RefreshFailed(Arc<HttpError>),

    #[error("Session refresh was abandoned before it settled")]
    RefreshAbandoned,

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpError {
    /// HTTP status carried by this error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            HttpError::ServerError { status, .. } | HttpError::BadRequest { status, .. } => {
                Some(*status)
            }
            HttpError::RateLimited { .. } => Some(429),
            HttpError::Unauthorized { .. } => Some(401),
            HttpError::Forbidden { .. } => Some(403),
            HttpError::NotFound(_) => Some(404),
            HttpError::RefreshFailed(cause) => cause.status(),
            _ => None,
        }
    }

    /// Backend-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            HttpError::ServerError { message, .. }
            | HttpError::Unauthorized { message }
            | HttpError::Forbidden { message }
            | HttpError::BadRequest { message, .. }
            | HttpError::NotFound(message) => Some(message.as_str()),
            HttpError::RefreshFailed(cause) => cause.message(),
            _ => None,
        }
    }

    /// Whether this is a 401 answer from the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized { .. })
    }
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Register failed: {0}")]
    RegisterFailed(String),
}
