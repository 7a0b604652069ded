//! Retry policy for remote calls

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    /// Whether the failed operation should be attempted again.
    fn is_retryable(&self) -> bool;
}

/// Retry configuration
///
/// The wait after the n-th failed attempt is
/// `initial_delay * backoff_multiplier^(n-1)`, clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base delay before clamping
    pub initial_delay: Duration,
    /// Lower bound for every wait
    pub min_delay: Duration,
    /// Upper bound for every wait
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a different attempt budget
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Wait after `attempt` failed attempts (1-based)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);

        let delay = Duration::from_millis(delay_ms.min(u64::MAX as f64) as u64);
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }
}

/// Retry middleware for remote operations
#[derive(Debug, Clone)]
pub struct RetryMiddleware {
    config: RetryConfig,
}

impl RetryMiddleware {
    /// Create new retry middleware
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Retry configuration in use
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute operation with retry logic
    ///
    /// Non-retryable errors return immediately. When every attempt fails the
    /// error from the final attempt is returned unchanged.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Request succeeded on attempt {attempt}");
                    }
                    return Ok(result);
                }
                Err(e) if !e.is_retryable() => {
                    debug!("Non-retryable error: {e}");
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!("Giving up after {attempt} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.config.calculate_delay(attempt);
                    warn!(
                        "Request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt, max_attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
