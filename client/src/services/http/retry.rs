//! # Retry Middleware
//!
//! Re-issues failed requests with exponential backoff plus random jitter.
//!
//! Attempt `n` (starting at 0) waits `retry_delay * 2^(n-1) + jitter` before
//! running, where the jitter is uniform in `[0, retry_delay / 2)`. A failure is
//! retried only when the server answered with a retryable status, the method
//! is retryable and attempts remain. Network errors (no response at all) are
//! returned immediately, as are non-idempotent methods like POST.

use rand::Rng;
use reqwest::Method;
use std::future::Future;
use std::time::Duration;

use crate::core::error::{ClientError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt (so `max_retries + 1` attempts total)
    pub max_retries: u32,
    /// Base delay; doubles with every retry
    pub retry_delay: Duration,
    pub retryable_statuses: Vec<u16>,
    pub retryable_methods: Vec<Method>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            retryable_statuses: vec![408, 429, 500, 502, 503, 504],
            retryable_methods: vec![
                Method::GET,
                Method::HEAD,
                Method::OPTIONS,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
            ],
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Whether `error` from a `method` request may be retried at all
    /// (ignoring the attempt budget).
    pub fn is_retryable(&self, method: &Method, error: &ClientError) -> bool {
        match error {
            ClientError::Http { status, .. } => {
                self.retryable_statuses.contains(status) && self.retryable_methods.contains(method)
            }
            _ => false,
        }
    }

    /// Deterministic part of the wait before `attempt` (1-based retries).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.retry_delay.saturating_mul(factor)
    }

    /// Full wait before `attempt`: base delay plus jitter in `[0, retry_delay / 2)`.
    pub fn backoff_delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let jitter_cap = self.retry_delay.as_secs_f64() * 0.5;
        let jitter = if jitter_cap > 0.0 {
            Duration::from_secs_f64(rng.random_range(0.0..jitter_cap))
        } else {
            Duration::ZERO
        };
        self.base_delay(attempt) + jitter
    }
}

/// Run `request` under the retry policy.
///
/// `request` is called once per attempt with the attempt number. `url` is
/// only used for logging.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, method: &Method, url: &str, mut request: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = config.backoff_delay(attempt, &mut rand::rng());
            tracing::info!(
                attempt = attempt,
                method = %method,
                url = %url,
                delay_ms = delay.as_millis() as u64,
                "Retry attempt {} for {} {}",
                attempt,
                method,
                url
            );
            tokio::time::sleep(delay).await;
        }

        match request(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !config.is_retryable(method, &err) || attempt >= config.max_retries {
                    return Err(err);
                }
                tracing::warn!(
                    attempt = attempt,
                    status = err.status(),
                    error = %err,
                    "Retryable request failure"
                );
            }
        }
        attempt += 1;
    }
}
