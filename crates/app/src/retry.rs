//! Retry policy for transient BLE disconnects.
//!
//! Wraps the two radio operations where link loss is expected (scanning and
//! connecting). Only [`PlugError::Disconnected`] is retried; every other
//! error is returned on the first occurrence.

use std::future::Future;
use std::time::Duration;

use plughub_domain::error::PlugError;

/// Bounded retry-on-disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// One initial attempt plus four retries.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    /// Create a policy making at most `max_attempts` attempts in total,
    /// sleeping `delay` between them.
    ///
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total number of attempts, including the first one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between two attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation`, retrying it while it fails with a disconnect.
    ///
    /// # Errors
    ///
    /// Returns the last [`PlugError::Disconnected`] once all attempts are
    /// used, or any other error as soon as it occurs.
    pub async fn run<T, F, Fut>(
        &self,
        name: &'static str,
        mut operation: F,
    ) -> Result<T, PlugError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlugError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(err) if err.is_disconnected() && attempt < self.max_attempts => {
                    tracing::warn!(
                        operation = name,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "BLE device disconnected, retrying"
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
                Err(err) if err.is_disconnected() => {
                    tracing::warn!(
                        operation = name,
                        attempts = attempt,
                        error = %err,
                        "BLE device disconnected, giving up"
                    );
                    return Err(err);
                }
                result => return result,
            }
        }
    }
}
