//! Background decode worker
//!
//! A single spawned task receives decode requests over an mpsc channel and
//! answers each through a oneshot reply. Requests and responses carry a task
//! id; a response whose id does not match its request is treated as a worker
//! failure. The CPU-bound decode runs on the blocking pool so the async
//! runtime keeps serving continuations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::codec;
use crate::constants::decoder;
use crate::errors::{DecodeError, DecodeResult};

/// Operations a background context can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffloadOp {
    /// Decode an encoded payload and parse the resulting JSON
    DecodeAndParse,
}

/// Background execution context accepting `(op, payload)`
#[async_trait]
pub trait OffloadContext: Send + Sync + std::fmt::Debug {
    /// Whether requests can currently be accepted
    fn is_available(&self) -> bool;

    async fn run(&self, op: OffloadOp, payload: String) -> DecodeResult<Value>;
}

#[derive(Debug)]
struct WorkerRequest {
    task_id: u64,
    op: OffloadOp,
    payload: String,
    reply: oneshot::Sender<WorkerResponse>,
}

#[derive(Debug)]
struct WorkerResponse {
    task_id: u64,
    result: DecodeResult<Value>,
}

/// Decode worker running on the tokio runtime
#[derive(Debug)]
pub struct DecodeWorker {
    tx: mpsc::Sender<WorkerRequest>,
    next_task_id: AtomicU64,
    stopped: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DecodeWorker {
    /// Spawn the worker task; must be called inside a tokio runtime
    pub fn spawn() -> Self {
        Self::spawn_with_capacity(decoder::WORKER_CHANNEL_CAPACITY)
    }

    pub fn spawn_with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(Self::run_loop(rx));
        info!("Decode worker started");

        Self {
            tx,
            next_task_id: AtomicU64::new(1),
            stopped: AtomicBool::new(false),
            handle: Mutex::new(Some(handle)),
        }
    }

    async fn run_loop(mut rx: mpsc::Receiver<WorkerRequest>) {
        while let Some(request) = rx.recv().await {
            let WorkerRequest {
                task_id,
                op,
                payload,
                reply,
            } = request;

            let result = match op {
                OffloadOp::DecodeAndParse => {
                    match tokio::task::spawn_blocking(move || codec::decode_and_parse(&payload))
                        .await
                    {
                        Ok(result) => result,
                        Err(e) => Err(DecodeError::Worker {
                            reason: format!("decode task {} aborted: {}", task_id, e),
                        }),
                    }
                }
            };

            if reply.send(WorkerResponse { task_id, result }).is_err() {
                debug!("Decode task {} caller went away", task_id);
            }
        }
        debug!("Decode worker channel closed");
    }

    /// Stop the worker; later requests fail with `WorkerUnavailable`
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Decode worker stopped");
        }
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[async_trait]
impl OffloadContext for DecodeWorker {
    fn is_available(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst) && !self.tx.is_closed()
    }

    async fn run(&self, op: OffloadOp, payload: String) -> DecodeResult<Value> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(DecodeError::WorkerUnavailable);
        }

        let task_id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        self.tx
            .send(WorkerRequest {
                task_id,
                op,
                payload,
                reply,
            })
            .await
            .map_err(|_| DecodeError::WorkerUnavailable)?;

        let response = response.await.map_err(|_| DecodeError::WorkerUnavailable)?;
        if response.task_id != task_id {
            return Err(DecodeError::Worker {
                reason: format!(
                    "response for task {} delivered to task {}",
                    response.task_id, task_id
                ),
            });
        }
        response.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_worker_decodes() {
        let worker = DecodeWorker::spawn();
        let value = json!([{"file": "a.json", "name": "A"}]);

        let decoded = worker
            .run(OffloadOp::DecodeAndParse, codec::encode_value(&value))
            .await
            .unwrap();

        assert_eq!(decoded, value);
        assert!(worker.is_available());
    }

    #[tokio::test]
    async fn test_worker_reports_decode_errors() {
        let worker = DecodeWorker::spawn();
        let err = worker
            .run(OffloadOp::DecodeAndParse, "%%%".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_stopped_worker_is_unavailable() {
        let worker = DecodeWorker::spawn();
        worker.shutdown();

        assert!(!worker.is_available());
        let err = worker
            .run(OffloadOp::DecodeAndParse, codec::encode_text("[]"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::WorkerUnavailable));
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_their_own_answers() {
        let worker = std::sync::Arc::new(DecodeWorker::spawn());
        let mut handles = Vec::new();
        for i in 0..8 {
            let worker = worker.clone();
            handles.push(tokio::spawn(async move {
                let value = json!({"n": i});
                let decoded = worker
                    .run(OffloadOp::DecodeAndParse, codec::encode_value(&value))
                    .await
                    .unwrap();
                (value, decoded)
            }));
        }

        for handle in handles {
            let (expected, decoded) = handle.await.unwrap();
            assert_eq!(expected, decoded);
        }
    }
}
