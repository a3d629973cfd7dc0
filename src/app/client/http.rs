//! HTTP transport with rate limiting
//!
//! This module provides the reqwest-backed [`Transport`]. Retries live in the
//! fetcher; this layer only throttles requests and maps reqwest failures onto
//! [`FetchError`].

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use super::{ClientConfig, Transport, TransportResponse};
use crate::errors::{FetchError, FetchResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// CDN transport backed by reqwest
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpTransport {
    /// Creates a transport with the given client and rate limit
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` if the rate limit is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> FetchResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Creates a transport from client configuration
    pub fn from_config(config: &ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        Self::new(client, config.rate_limit_rps)
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> FetchResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| FetchError::Network {
            url: String::new(),
            reason: "rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> FetchResult<TransportResponse> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Jitter spreads out the parallel fan-out of a batch
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(TransportResponse::new(status, body))
    }
}
