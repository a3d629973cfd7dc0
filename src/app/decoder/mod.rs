//! Payload decoder with optional worker offload
//!
//! Large payloads are handed to an [`OffloadContext`] when one is available;
//! any worker failure is logged and the payload is decoded inline instead, so
//! a broken worker never loses data.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::app::codec;
use crate::constants::decoder;
use crate::errors::DecodeResult;

pub mod worker;

pub use worker::{DecodeWorker, OffloadContext, OffloadOp};

/// Decoder turning encoded payloads into parsed JSON
#[derive(Debug, Clone)]
pub struct Decoder {
    offload: Option<Arc<dyn OffloadContext>>,
    threshold: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::inline()
    }
}

impl Decoder {
    /// Decoder that always decodes in-process
    pub fn inline() -> Self {
        Self {
            offload: None,
            threshold: decoder::WORKER_THRESHOLD,
        }
    }

    /// Decoder offloading payloads longer than `threshold` chars
    pub fn with_offload(offload: Arc<dyn OffloadContext>, threshold: usize) -> Self {
        Self {
            offload: Some(offload),
            threshold,
        }
    }

    /// Decode and parse an encoded payload
    pub async fn decode(&self, encoded: &str) -> DecodeResult<Value> {
        if let Some(offload) = &self.offload {
            if offload.is_available() && encoded.len() > self.threshold {
                match offload
                    .run(OffloadOp::DecodeAndParse, encoded.to_string())
                    .await
                {
                    Ok(value) => return Ok(value),
                    Err(e) => warn!("Worker decode failed, falling back to inline decode: {}", e),
                }
            }
        }

        debug!("Decoding {} chars inline", encoded.len());
        codec::decode_and_parse(encoded)
    }
}
