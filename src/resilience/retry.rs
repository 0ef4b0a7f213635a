//! Retry with exponential backoff.
//!
//! Transient errors (rate limits, timeouts, refused connections, 503s) are
//! retried; a `Retry-After` hint from the service replaces the computed
//! backoff for that attempt, capped at `max_delay`.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::error::StudyBuddyError;

/// Executes operations with retry logic and exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates a new retry executor with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Creates a retry executor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or `max_retries` retries have been spent.
    ///
    /// `operation` is invoked once per attempt, so it must rebuild whatever
    /// it sends.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, StudyBuddyError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StudyBuddyError>>,
    {
        let mut attempts = 0;
        let mut delay = self.config.initial_delay;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempts > 0 {
                        tracing::info!(retries = attempts, "Operation succeeded after retrying");
                    }
                    return Ok(result);
                }
                Err(e) if e.is_retryable() && attempts < self.config.max_retries => {
                    attempts += 1;

                    let wait = match e.retry_after() {
                        Some(hint) => hint.min(self.config.max_delay),
                        None => self.add_jitter(delay),
                    };

                    tracing::warn!(
                        attempt = attempts,
                        max_retries = self.config.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "Retryable error, backing off"
                    );

                    sleep(wait).await;

                    delay = std::cmp::min(
                        Duration::from_secs_f64(delay.as_secs_f64() * self.config.multiplier),
                        self.config.max_delay,
                    );
                }
                Err(e) => {
                    if attempts > 0 {
                        tracing::error!(retries = attempts, error = %e, "Operation failed after retrying");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Spreads `duration` by up to +/- `jitter` of its length.
    fn add_jitter(&self, duration: Duration) -> Duration {
        let jitter_range = duration.as_secs_f64() * self.config.jitter;
        let jitter = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;

        Duration::from_secs_f64((duration.as_secs_f64() + jitter).max(0.0))
    }

    /// Returns the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, NetworkError, RateLimitError, ResponseError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_eventually() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StudyBuddyError::Network(NetworkError::Timeout))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(StudyBuddyError::Network(NetworkError::ConnectionFailed {
                        message: "refused".to_string(),
                    }))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_returned_immediately() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(StudyBuddyError::Configuration(ConfigurationError::MissingCredentials))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_interrupted_stream_is_not_retried() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let _: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(StudyBuddyError::Response(ResponseError::StreamInterrupted {
                        message: "reset".to_string(),
                    }))
                }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_after_hint_is_honored() {
        let executor = RetryExecutor::new(fast_config(1));
        let attempts = Arc::new(AtomicU32::new(0));

        let start = std::time::Instant::now();
        let result = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(StudyBuddyError::RateLimit(RateLimitError::TooManyRequests {
                            retry_after: Some(Duration::from_millis(50)),
                        }))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_hint_is_capped_by_max_delay() {
        let executor = RetryExecutor::new(RetryConfig::default());
        let attempts = Arc::new(AtomicU32::new(0));

        let start = tokio::time::Instant::now();
        let result: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(StudyBuddyError::RateLimit(RateLimitError::TooManyRequests {
                        retry_after: Some(Duration::from_secs(86_400)),
                    }))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // two capped waits of 30s each
        assert!(start.elapsed() <= Duration::from_secs(61));
    }

    #[tokio::test]
    async fn test_no_retry_config() {
        let executor = RetryExecutor::new(RetryConfig::no_retry());
        let attempts = Arc::new(AtomicU32::new(0));

        let _: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(StudyBuddyError::Network(NetworkError::Timeout))
                }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_add_jitter_stays_in_range() {
        let executor = RetryExecutor::with_defaults();
        let jittered = executor.add_jitter(Duration::from_secs(10));

        // default jitter is 25%
        assert!(jittered >= Duration::from_millis(7_500));
        assert!(jittered <= Duration::from_millis(12_500));
    }
}
