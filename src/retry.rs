/// Bounded retry with a fixed delay between attempts
///
/// Every network call in the pipeline goes through a `RetryPolicy`. When a
/// shutdown signal is attached, a pending delay ends early on shutdown and the
/// last error is returned instead of sleeping it out. Errors that are not
/// retryable (`MonitorError::is_retryable`) are returned on the first attempt.
use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use crate::shutdown::ShutdownSignal;
use crate::utils::check_shutdown_or_delay;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    shutdown: Option<ShutdownSignal>,
}

impl RetryPolicy {
    /// `max_attempts` of 0 is treated as 1
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            shutdown: None,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.delay_ms))
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds or `max_attempts` is exhausted
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> MonitorResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = MonitorResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        logger::debug(
                            LogTag::Rpc,
                            &format!("{} succeeded on attempt {}/{}", label, attempt, self.max_attempts),
                        );
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            // Malformed data and bad addresses fail the same way on every attempt
            if !err.is_retryable() || attempt >= self.max_attempts {
                return Err(err);
            }

            logger::warning(
                LogTag::Rpc,
                &format!(
                    "{} attempt {}/{} failed, retrying in {}ms: {}",
                    label,
                    attempt,
                    self.max_attempts,
                    self.delay.as_millis(),
                    err
                ),
            );

            match &self.shutdown {
                Some(shutdown) => {
                    if check_shutdown_or_delay(shutdown, self.delay).await {
                        return Err(err);
                    }
                }
                None => tokio::time::sleep(self.delay).await,
            }
        }
    }
}
