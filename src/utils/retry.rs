//! Retry utilities with exponential backoff for provider calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// How many times, and how patiently, a provider call is attempted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Backoff multiplier (delay *= multiplier after each retry).
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that attempts an operation at most `max_attempts` times.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(1)
    }

    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(delay.as_secs_f64() * self.multiplier).min(self.max_delay)
    }
}

/// Determines if an error is worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `operation` until it succeeds, fails permanently, or the policy's
/// attempts are used up. The last error is returned on failure.
pub async fn retry_with<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    let mut delay = policy.initial_delay;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= policy.max_attempts || !error.is_retryable() {
                    return Err(error);
                }

                let jitter = Duration::from_millis(jitter_ms(delay.as_millis() as u64 / 4));
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    "transient provider error, retrying: {error}"
                );
                sleep(delay + jitter).await;
                delay = policy.next_delay(delay);
            }
        }
    }
}

/// Cheap time-seeded jitter in `[0, max)`.
fn jitter_ms(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    seed % max
}
