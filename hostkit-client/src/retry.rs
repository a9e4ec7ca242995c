//! Retry with exponential backoff for API requests.
//!
//! [`execute_with_retry`] wraps one logical operation. Failures with a status
//! in [`RETRYABLE_STATUSES`] are retried up to [`RetryOptions::max_attempts`];
//! everything else propagates on first occurrence.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::types::{ApiError, RateLimitEvent, Result};

/// Statuses that are retried.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Jitter applied to computed backoff, as a fraction of the delay.
const JITTER_FRACTION: f64 = 0.25;

/// Callback invoked when a 429 response carries a wait hint.
pub type RateLimitCallback = Arc<dyn Fn(&RateLimitEvent) + Send + Sync>;

/// Retry tuning for one client.
#[derive(Clone)]
pub struct RetryOptions {
    /// Upper bound on total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for each one after.
    pub base_delay: Duration,
    /// Cap on computed backoff (before jitter).
    pub max_delay: Duration,
    pub on_rate_limit: Option<RateLimitCallback>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(60_000),
            on_rate_limit: None,
        }
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("on_rate_limit", &self.on_rate_limit.is_some())
            .finish()
    }
}

impl RetryOptions {
    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base backoff delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the backoff cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Register a callback for rate-limit waits.
    pub fn on_rate_limit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RateLimitEvent) + Send + Sync + 'static,
    {
        self.on_rate_limit = Some(Arc::new(callback));
        self
    }
}

/// Whether the error should be retried.
///
/// Errors without a status (network, decode, token) are never retried.
pub fn is_retryable(err: &ApiError) -> bool {
    err.status()
        .is_some_and(|status| RETRYABLE_STATUSES.contains(&status))
}

/// `min(base * 2^(attempt-1), max)`, without jitter.
fn exponential_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let exponent = attempt.saturating_sub(1).min(63);
    let millis = (base.as_millis() as f64) * 2f64.powi(exponent as i32);
    let capped = millis.min(max.as_millis() as f64);
    Duration::from_millis(capped as u64)
}

/// Jittered exponential backoff for the given 1-based attempt.
///
/// The result lies within ±25% of `min(base * 2^(attempt-1), max)`.
pub fn compute_backoff(attempt: u32, options: &RetryOptions) -> Duration {
    let delay = exponential_delay(attempt, options.base_delay, options.max_delay);
    let millis = delay.as_millis() as f64;
    let jitter = rand::thread_rng().gen_range(-JITTER_FRACTION..=JITTER_FRACTION) * millis;
    Duration::from_millis((millis + jitter).max(0.0) as u64)
}

/// Message carried into an exhausted-retry error.
fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { message, .. } | ApiError::RetryExhausted { message, .. } => {
            message.clone()
        }
        other => other.to_string(),
    }
}

/// Run `operation` until it succeeds, fails fatally, or runs out of attempts.
///
/// `context` identifies the operation in logs and rate-limit events.
pub async fn execute_with_retry<T, F, Fut>(
    mut operation: F,
    context: &str,
    options: &RetryOptions,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = options.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retryable(&err) {
            return Err(err.at_attempt(attempt));
        }

        let status = err.status().unwrap_or(500);

        if attempt >= max_attempts {
            warn!(
                "{} failed after {} attempts (last status {})",
                context, max_attempts, status
            );
            return Err(ApiError::RetryExhausted {
                status,
                message: failure_message(&err),
                attempts: max_attempts,
            });
        }

        let delay = match (status, err.retry_after()) {
            (429, Some(wait_hint_secs)) => {
                debug!("{} rate limited, server asked to wait {}s", context, wait_hint_secs);
                if let Some(callback) = &options.on_rate_limit {
                    callback(&RateLimitEvent {
                        wait_hint_secs,
                        context: context.to_string(),
                        attempt,
                    });
                }
                Duration::from_millis(wait_hint_secs.saturating_mul(1000))
            }
            _ => compute_backoff(attempt, options),
        };

        debug!(
            "{} attempt {}/{} failed with {}, retrying in {:?}",
            context, attempt, max_attempts, status, delay
        );

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
