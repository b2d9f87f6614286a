//! Retry policy for backend calls

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::backend::BackendError;
use crate::config::ExtractorConfig;

/// Exponential backoff with jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            max_attempts: config.max_attempts().max(1),
            initial_delay: config.initial_backoff(),
            backoff_multiplier: 2.0,
            max_delay: config.max_backoff(),
        }
    }

    /// Calculate delay for given retry number (0-based), without jitter
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt.min(30) as i32);
        let delay_ms = (self.initial_delay.as_millis() as f64 * multiplier) as u64;
        Duration::from_millis(delay_ms).min(self.max_delay)
    }

    /// Backoff plus up to 25% random jitter, still capped at `max_delay`
    fn jittered_delay(&self, attempt: u32) -> Duration {
        let base = self.delay_for_attempt(attempt);
        let jitter_ms = (base.as_millis() as u64) / 4;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        (base + Duration::from_millis(jitter)).min(self.max_delay)
    }
}

/// Final error of a retried call and how many attempts were made.
#[derive(Debug)]
pub struct RetryExhausted {
    pub error: BackendError,
    pub attempts: u32,
}

/// Run `f` until it succeeds, fails permanently or runs out of attempts.
pub async fn retry_with_backoff<F, Fut, T>(policy: &RetryPolicy, mut f: F) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !error.is_transient() {
                    warn!("Non-retryable backend error, failing fast: {}", error);
                    return Err(RetryExhausted { error, attempts: attempt });
                }

                if attempt >= policy.max_attempts {
                    warn!("Max backend attempts ({}) exceeded: {}", policy.max_attempts, error);
                    return Err(RetryExhausted { error, attempts: attempt });
                }

                let delay = error
                    .retry_after()
                    .map_or_else(|| policy.jittered_delay(attempt - 1), |after| after.min(policy.max_delay));
                warn!(
                    "Retryable backend error, attempt {}/{}, retrying in {}ms: {}",
                    attempt,
                    policy.max_attempts,
                    delay.as_millis(),
                    error
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
