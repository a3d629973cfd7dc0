//! Transport layer for catalog requests
//!
//! The catalog engine talks to its data source through the [`Transport`]
//! trait so that the CDN, a local data directory (desktop shell) and scripted
//! fixtures are interchangeable.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: reqwest-backed transport with rate limiting
//! - `local`: local data directory transport
//! - `memory`: scripted in-memory transport
//! - `retry`: retrying fetcher with linear backoff

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::FetchResult;

pub mod config;
pub mod http;
pub mod local;
pub mod memory;
pub mod retry;

pub use config::ClientConfig;
pub use http::HttpTransport;
pub use local::LocalFileTransport;
pub use memory::MemoryTransport;
pub use retry::{Fetcher, RetryPolicy};

/// Response returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Successful response with a body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn into_text(self) -> String {
        self.body
    }

    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// GET transport used by the fetcher
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; only failures to obtain a response are errors.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn get(&self, url: &str) -> FetchResult<TransportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_helpers() {
        let response = TransportResponse::ok(r#"{"total": 3}"#);
        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["total"], 3);

        let missing = TransportResponse::new(404, "not found");
        assert!(!missing.is_success());
        assert!(missing.json().is_err());
        assert_eq!(missing.text(), "not found");
    }
}
