//! HTTP client layer: `CourseHubHttp` with session recovery and retry policies.

pub mod client;
pub mod retry;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use reqwest::Method;

pub use client::{CourseHubHttp, RequestOptions, DEFAULT_REFRESH_TIMEOUT};
pub use retry::{RetryConfig, RetryPolicy};
pub use session::{CredentialMarker, NoopHooks, RefreshCoordinator, SessionHooks};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};
