//! Network constants for the CourseHub SDK.

/// Default REST API base URL (local development backend).
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Environment variable read by `CourseHubClientBuilder::from_env`.
pub const API_URL_ENV: &str = "COURSEHUB_API_URL";

/// Session refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";
