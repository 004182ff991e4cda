//! Streaming bridge.
//!
//! One task per stream waits on three sources at once: raw fragments, the
//! transport's error channel and the caller's cancellation. Every fragment
//! becomes an SSE-framed data chunk, in order. The stream then ends with
//! exactly one terminal chunk:
//!
//! - data channel closed, no error pending: `is_final`
//! - error received: the error annotated with backend and service
//! - cancellation: the cancellation cause, ahead of anything still pending
//!
//! Sending blocks until the consumer has room, which in turn stops the
//! bridge from draining the backend. If the consumer goes away the bridge
//! stops without emitting anything else.

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::defaults::streaming::OUTPUT_CHANNEL_CAPACITY;
use crate::error::AdapterError;
use crate::execution::http::transport::RawStream;
use crate::types::StreamChunk;
use crate::utils::cancel::CancelHandle;

/// Output side of a bridge. Consuming `finish` guarantees a single
/// terminal chunk.
struct ChunkSink {
    out: mpsc::Sender<StreamChunk>,
}

enum Sent {
    Delivered,
    Cancelled,
    ConsumerGone,
}

impl ChunkSink {
    async fn data(&self, payload: &Bytes, cancel: &CancelHandle) -> Sent {
        let chunk = StreamChunk::data_frame(payload);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Sent::Cancelled,
            sent = self.out.send(chunk) => match sent {
                Ok(()) => Sent::Delivered,
                Err(_) => Sent::ConsumerGone,
            },
        }
    }

    async fn finish(self, chunk: StreamChunk) {
        debug_assert!(chunk.is_terminal());
        if self.out.send(chunk).await.is_err() {
            debug!("stream consumer dropped before terminal chunk");
        }
    }
}

/// Adapts a [`RawStream`] into [`StreamChunk`]s for one backend service.
#[derive(Debug, Clone)]
pub struct StreamBridge {
    backend: String,
    service: String,
    request_id: String,
}

impl StreamBridge {
    pub fn new(backend: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            service: service.into(),
            request_id: String::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    fn failure(&self, error: AdapterError) -> StreamChunk {
        let error = error.in_service(&self.backend, &self.service);
        warn!(
            request_id = %self.request_id,
            backend = %self.backend,
            service = %self.service,
            error = %error,
            "stream failed"
        );
        StreamChunk::error_chunk(error)
    }

    fn cancelled(&self, cancel: &CancelHandle) -> StreamChunk {
        let cause = cancel.cause();
        debug!(
            request_id = %self.request_id,
            backend = %self.backend,
            service = %self.service,
            cause = %cause,
            "stream cancelled"
        );
        StreamChunk::error_chunk(cause)
    }

    /// Deliver a backend terminal unless cancellation fires while the
    /// consumer is still full, in which case the cause replaces it.
    async fn settle(&self, sink: ChunkSink, terminal: StreamChunk, cancel: &CancelHandle) {
        debug_assert!(terminal.is_terminal());
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => sink.out.send(self.cancelled(cancel)).await,
            sent = sink.out.send(terminal) => sent,
        };
        if sent.is_err() {
            debug!(request_id = %self.request_id, "stream consumer dropped before terminal chunk");
        }
    }

    /// Drive `raw` to completion, writing chunks to `out`.
    pub async fn run(self, mut raw: RawStream, cancel: CancelHandle, out: mpsc::Sender<StreamChunk>) {
        let sink = ChunkSink { out };
        let mut errors_open = true;
        let mut frames = 0usize;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return sink.finish(self.cancelled(&cancel)).await;
                }

                fragment = raw.data.recv() => match fragment {
                    Some(payload) => match sink.data(&payload, &cancel).await {
                        Sent::Delivered => frames += 1,
                        Sent::Cancelled => return sink.finish(self.cancelled(&cancel)).await,
                        Sent::ConsumerGone => {
                            debug!(request_id = %self.request_id, "stream consumer dropped");
                            return;
                        }
                    },
                    None => {
                        // Transports report their error before closing data.
                        let terminal = match raw.errors.try_recv() {
                            Ok(error) => self.failure(error),
                            Err(_) => {
                                debug!(
                                    request_id = %self.request_id,
                                    backend = %self.backend,
                                    service = %self.service,
                                    frames,
                                    "stream completed"
                                );
                                StreamChunk::final_chunk()
                            }
                        };
                        return self.settle(sink, terminal, &cancel).await;
                    }
                },

                error = raw.errors.recv(), if errors_open => match error {
                    Some(error) => return self.settle(sink, self.failure(error), &cancel).await,
                    None => errors_open = false,
                },
            }
        }
    }

    /// Run the bridge on its own task and return the chunk receiver.
    pub fn spawn(self, raw: RawStream, cancel: CancelHandle) -> mpsc::Receiver<StreamChunk> {
        let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        tokio::spawn(self.run(raw, cancel, tx));
        rx
    }
}
