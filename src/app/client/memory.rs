//! Scripted in-memory transport
//!
//! Serves registered responses per URL and records every request. A URL can
//! be given a sequence of outcomes (e.g. two 500s then a 200); the last
//! outcome repeats once the sequence is exhausted. Used for offline fixtures
//! and throughout the test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Transport, TransportResponse};
use crate::errors::{FetchError, FetchResult};

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(TransportResponse),
    /// Connection-level failure
    NetworkFailure(String),
}

#[derive(Debug, Default)]
struct Route {
    outcomes: VecDeque<Scripted>,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<String, Route>,
    requests: Vec<String>,
}

/// Transport answering from a table of scripted responses
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inner: Mutex<Inner>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `url` with `response`
    pub fn insert(&self, url: impl Into<String>, response: TransportResponse) {
        self.script(url, vec![Scripted::Respond(response)]);
    }

    /// Always answer `url` with `200` and a JSON body
    pub fn insert_json(&self, url: impl Into<String>, body: &serde_json::Value) {
        self.insert(url, TransportResponse::ok(body.to_string()));
    }

    /// Answer `url` with `outcomes` in order, repeating the last one
    pub fn script(&self, url: impl Into<String>, outcomes: Vec<Scripted>) {
        let mut inner = self.lock();
        let route = inner.routes.entry(url.into()).or_default();
        route.outcomes = outcomes.into();
    }

    /// Delay every answer for `url`
    pub fn set_delay(&self, url: impl Into<String>, delay: Duration) {
        let mut inner = self.lock();
        inner.routes.entry(url.into()).or_default().delay = Some(delay);
    }

    /// Number of requests issued for `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.lock().requests.iter().filter(|r| *r == url).count()
    }

    /// Total number of requests issued
    pub fn total_requests(&self) -> usize {
        self.lock().requests.len()
    }

    /// Every request in issue order
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-request
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_outcome(&self, url: &str) -> (Option<Scripted>, Option<Duration>) {
        let mut inner = self.lock();
        inner.requests.push(url.to_string());
        match inner.routes.get_mut(url) {
            Some(route) => {
                let outcome = if route.outcomes.len() > 1 {
                    route.outcomes.pop_front()
                } else {
                    route.outcomes.front().cloned()
                };
                (outcome, route.delay)
            }
            None => (None, None),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> FetchResult<TransportResponse> {
        let (outcome, delay) = self.next_outcome(url);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::NetworkFailure(reason)) => Err(FetchError::Network {
                url: url.to_string(),
                reason,
            }),
            None => Err(FetchError::NoRoute {
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_then_repeat_last() {
        let transport = MemoryTransport::new();
        transport.script(
            "u",
            vec![
                Scripted::Respond(TransportResponse::new(500, "")),
                Scripted::Respond(TransportResponse::ok("done")),
            ],
        );

        assert_eq!(transport.get("u").await.unwrap().status, 500);
        assert_eq!(transport.get("u").await.unwrap().text(), "done");
        assert_eq!(transport.get("u").await.unwrap().text(), "done");
        assert_eq!(transport.request_count("u"), 3);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let transport = MemoryTransport::new();
        let err = transport.get("missing").await.unwrap_err();
        assert!(matches!(err, FetchError::NoRoute { .. }));
        assert_eq!(transport.total_requests(), 1);
    }
}
