//! Opt-in retries for transient failures.
//!
//! Requests are sent once unless the caller asks for a [`RetryPolicy`]
//! through [`RequestOptions::retry`](crate::http::RequestOptions::retry).
//! A 401 is never retried here; that is session recovery's job.

use crate::error::HttpError;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryPolicy {
    /// Send once; every failure reaches the caller unchanged.
    #[default]
    None,
    /// Retry transient failures with exponential backoff.
    Backoff(RetryConfig),
}

impl RetryPolicy {
    /// Backoff with [`RetryConfig::default`].
    pub fn backoff() -> Self {
        RetryPolicy::Backoff(RetryConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Statuses treated as transient. 429 also honours `Retry-After`.
    pub statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            statuses: vec![429, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn is_retryable(&self, error: &HttpError) -> bool {
        match error {
            HttpError::ServerError { status, .. } => self.statuses.contains(status),
            HttpError::RateLimited { .. } => self.statuses.contains(&429),
            HttpError::Reqwest(e) => e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (0-based), with ±25% jitter.
    pub fn delay_for(&self, attempt: u32, error: &HttpError) -> Duration {
        if let HttpError::RateLimited {
            retry_after_ms: Some(ms),
        } = error
        {
            return Duration::from_millis(*ms).min(self.max_delay);
        }
        let base = self
            .initial_delay
            .saturating_mul(1 << attempt.min(16))
            .min(self.max_delay);
        base.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
    }
}
