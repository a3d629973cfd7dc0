//! Retrying fetcher
//!
//! Wraps a [`Transport`] with bounded attempts and linear backoff. Network
//! failures and HTTP 5xx are retried; HTTP 4xx and other permanent failures
//! are raised immediately.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Transport, TransportResponse};
use crate::constants::limits;
use crate::errors::{FetchError, FetchResult};

/// Attempt bound and backoff base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: limits::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(limits::RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following the zero-based `attempt_index`
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        self.base_delay.saturating_mul(attempt_index + 1)
    }
}

/// Fetcher issuing GET requests with retry
#[derive(Debug, Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch with the policy's attempt bound
    pub async fn fetch(&self, url: &str) -> FetchResult<TransportResponse> {
        self.fetch_with_retry(url, self.policy.max_attempts).await
    }

    /// Fetch `url`, retrying transient failures up to `max_attempts` times
    ///
    /// # Errors
    ///
    /// Returns the first permanent error, or the last transient error once
    /// every attempt has failed.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        max_attempts: u32,
    ) -> FetchResult<TransportResponse> {
        let mut last_error = FetchError::NoAttempts;

        for attempt in 0..max_attempts {
            let error = match self.transport.get(url).await {
                Ok(response) if response.is_success() => {
                    debug!("Fetched {} on attempt {}", url, attempt + 1);
                    return Ok(response);
                }
                Ok(response) => FetchError::HttpStatus {
                    url: url.to_string(),
                    status: response.status,
                },
                Err(e) => e,
            };

            if !error.is_transient() {
                debug!("Permanent failure for {}: {}", url, error);
                return Err(error);
            }

            if attempt + 1 < max_attempts {
                let delay = self.policy.delay_after(attempt);
                warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                    attempt + 1,
                    max_attempts,
                    error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            last_error = error;
        }

        warn!(
            "Request to {} failed after {} attempts: {}",
            url, max_attempts, last_error
        );
        Err(last_error)
    }
}
