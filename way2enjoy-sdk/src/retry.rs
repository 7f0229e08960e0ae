// ABOUTME: Retry logic granting one extra attempt to transient failures
// ABOUTME: Connection and server faults retry once; account and client faults never retry

use crate::constants::retry;
use crate::error::Way2enjoyError;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: retry::RETRY_DELAY,
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error, or has
/// used up `MAX_RETRIES`. The last attempt's error is returned unchanged.
pub async fn retry_transient<F, Fut, T>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, Way2enjoyError>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, Way2enjoyError>>,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() || attempt >= retry::MAX_RETRIES {
                    return Err(error);
                }

                log::warn!(
                    "Request failed (retrying {}/{}): {}",
                    attempt + 1,
                    retry::MAX_RETRIES,
                    error
                );
                if !config.delay.is_zero() {
                    sleep(config.delay).await;
                }
                attempt += 1;
            }
        }
    }
}
