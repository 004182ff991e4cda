//! Stream framing.
//!
//! Splits a response byte stream into JSON fragments and forwards each one,
//! re-encoded as compact JSON, to a [`RawStreamSender`]. Decoding stops at
//! the first error, which becomes the stream's terminal error.

use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt, TryStreamExt};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

use super::transport::RawStreamSender;
use crate::defaults::streaming::SSE_DONE_MARKER;
use crate::error::AdapterError;
use crate::types::Document;

/// Decode one fragment and re-encode it compactly.
pub fn normalize_fragment(raw: &str) -> Result<Bytes, AdapterError> {
    let doc: Document = serde_json::from_str(raw)
        .map_err(|e| AdapterError::DecodeError(format!("invalid stream fragment: {e}")))?;
    Ok(Bytes::from(serde_json::to_vec(&doc)?))
}

/// Forward a decoded fragment. Returns `false` when forwarding must stop.
async fn forward(raw: &str, sink: &RawStreamSender) -> bool {
    match normalize_fragment(raw) {
        Ok(fragment) => sink.send(fragment).await,
        Err(e) => {
            sink.fail(e);
            false
        }
    }
}

/// Newline-delimited JSON documents. Blank lines are skipped.
pub async fn forward_json_lines<S, E>(stream: S, sink: &RawStreamSender)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let byte_stream = stream.map_err(|e| std::io::Error::other(format!("Stream error: {e}")));
    let reader = StreamReader::new(byte_stream);
    let mut lines = std::pin::pin!(FramedRead::new(reader, LinesCodec::new()));

    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if !forward(trimmed, sink).await {
                    return;
                }
            }
            Err(e) => {
                sink.fail(AdapterError::StreamError(format!("JSON line error: {e}")));
                return;
            }
        }
    }
}

/// Server-sent events. Only `data` payloads are forwarded; `[DONE]` ends
/// the stream.
pub async fn forward_sse<S, E>(stream: S, sink: &RawStreamSender)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut events = std::pin::pin!(stream.eventsource());

    while let Some(event) = events.next().await {
        match event {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() {
                    continue;
                }
                if data == SSE_DONE_MARKER {
                    return;
                }
                if !forward(data, sink).await {
                    return;
                }
            }
            Err(e) => {
                sink.fail(AdapterError::StreamError(format!("SSE error: {e}")));
                return;
            }
        }
    }
}
