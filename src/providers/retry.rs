// Retry logic with exponential backoff

use anyhow::Result;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1000;

/// How many times a provider request is attempted, and how long to back off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before the attempt following `attempt` (0-based)
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

/// A provider answered with a non-success HTTP status
#[derive(Debug, Error)]
#[error("{provider} API request failed\n\nStatus: {status}\nBody: {body}")]
pub struct ApiStatusError {
    pub provider: String,
    pub status: StatusCode,
    pub body: String,
}

impl ApiStatusError {
    pub fn new(provider: impl Into<String>, status: StatusCode, body: String) -> Self {
        Self {
            provider: provider.into(),
            status,
            body,
        }
    }

    /// Rate limiting and server-side failures may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS || self.status.is_server_error()
    }
}

/// Whether another attempt could help.
///
/// Non-transient HTTP statuses (bad request, auth) fail immediately; transport
/// and decode errors are retried.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApiStatusError>())
        .map_or(true, ApiStatusError::is_transient)
}

/// Execute a function with exponential backoff retry logic
pub async fn with_retry<F, Fut, T>(policy: RetryPolicy, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt + 1 >= attempts => return Err(e),
            Err(e) if !is_retryable(&e) => {
                tracing::debug!("Request failed with a non-retryable error: {:#}", e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "Request failed (attempt {}/{}), retrying in {:?}: {:#}",
                    attempt + 1,
                    attempts,
                    delay,
                    e
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
