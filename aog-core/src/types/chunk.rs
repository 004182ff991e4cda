//! Stream chunk types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::defaults::streaming::EVENT_STREAM_CONTENT_TYPE;
use crate::error::AdapterError;

pub const CONTENT_TYPE_KEY: &str = "content-type";

/// One event delivered to the orchestrator on a streaming call.
///
/// A stream carries any number of data frames followed by exactly one
/// terminal chunk (`is_final` or `error`).
#[derive(Debug, Clone, PartialEq)]
pub struct StreamChunk {
    pub data: Option<Bytes>,
    pub metadata: BTreeMap<String, String>,
    pub error: Option<AdapterError>,
    pub is_final: bool,
}

impl StreamChunk {
    /// A non-terminal chunk carrying `payload` in SSE framing.
    pub fn data_frame(payload: &[u8]) -> Self {
        let mut framed = BytesMut::with_capacity(payload.len() + 8);
        framed.put_slice(b"data: ");
        framed.put_slice(payload);
        framed.put_slice(b"\n\n");

        let mut metadata = BTreeMap::new();
        metadata.insert(
            CONTENT_TYPE_KEY.to_string(),
            EVENT_STREAM_CONTENT_TYPE.to_string(),
        );
        Self {
            data: Some(framed.freeze()),
            metadata,
            error: None,
            is_final: false,
        }
    }

    /// Terminal chunk for a cleanly finished stream.
    pub fn final_chunk() -> Self {
        Self {
            data: None,
            metadata: BTreeMap::new(),
            error: None,
            is_final: true,
        }
    }

    /// Terminal chunk carrying a failure.
    pub fn error_chunk(error: AdapterError) -> Self {
        Self {
            data: None,
            metadata: BTreeMap::new(),
            error: Some(error),
            is_final: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_final || self.error.is_some()
    }

    pub fn to_wire(&self) -> StreamChunkWire {
        StreamChunkWire::from(self)
    }
}

/// Serializable form of [`StreamChunk`]: bytes are base64 encoded and the
/// error is rendered as its message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunkWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "isFinal", default)]
    pub is_final: bool,
}

impl From<&StreamChunk> for StreamChunkWire {
    fn from(chunk: &StreamChunk) -> Self {
        Self {
            data: chunk.data.as_ref().map(|d| STANDARD.encode(d)),
            metadata: chunk.metadata.clone(),
            error: chunk.error.as_ref().map(ToString::to_string),
            is_final: chunk.is_final,
        }
    }
}

impl StreamChunkWire {
    /// Raw frame bytes, if any.
    pub fn decode_data(&self) -> Result<Option<Vec<u8>>, AdapterError> {
        self.data
            .as_deref()
            .map(|d| {
                STANDARD
                    .decode(d)
                    .map_err(|e| AdapterError::DecodeError(format!("invalid chunk data: {e}")))
            })
            .transpose()
    }
}
