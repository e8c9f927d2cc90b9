use log::warn;
use metrics::counter;
use std::{future::Future, time::Duration};

use crate::config::RetryConfig;
use crate::errors::{AirdropError, Result};
use crate::metrics::METRIC_PAGE_RETRIES;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    backoff_base: Duration,
    backoff_max: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: Option<u32>, backoff_base: Duration, backoff_max: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
            backoff_max,
        }
    }

    /// Retry forever, no delay.
    pub fn unbounded() -> Self {
        Self::new(None, Duration::ZERO, Duration::ZERO)
    }

    pub fn backoff_for(&self, retries: u32) -> Duration {
        let factor = 2u32.saturating_pow(retries.saturating_sub(1));
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }

    /// Runs `operation` for one page until it succeeds or the attempt budget
    /// is spent. Every error counts as retryable.
    pub async fn retry_with_backoff<F, Fut, T>(&self, page: u32, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if let Some(max) = self.max_attempts {
                        if attempts >= max {
                            return Err(AirdropError::PageFailed {
                                page,
                                attempts,
                                last_error: e.to_string(),
                            });
                        }
                    }

                    warn!("Page {} attempt {} failed: {}. Retry...", page, attempts, e);
                    counter!(METRIC_PAGE_RETRIES, 1);

                    let backoff = self.backoff_for(attempts);
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.backoff_base, config.backoff_max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_until_success() {
        let policy = RetryPolicy::new(Some(5), Duration::ZERO, Duration::ZERO);
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let value = policy
            .retry_with_backoff(3, move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AirdropError::Config("flaky".into()))
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(Some(4), Duration::ZERO, Duration::ZERO);
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<()> = policy
            .retry_with_backoff(7, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AirdropError::Config("down".into()))
            })
            .await;

        match result {
            Err(AirdropError::PageFailed { page, attempts, .. }) => {
                assert_eq!(page, 7);
                assert_eq!(attempts, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(None, Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(40), Duration::from_millis(500));
    }
}
