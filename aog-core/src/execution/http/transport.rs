//! Transport client contract.
//!
//! A transport sends one request and either returns the decoded body
//! (`execute`) or hands back a pair of channels carrying the raw stream
//! (`stream`): fragments on one, at most one terminal error on the other.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::defaults::streaming::{DATA_CHANNEL_CAPACITY, ERROR_CHANNEL_CAPACITY};
use crate::error::AdapterError;
use crate::types::InvocationContext;
use crate::utils::cancel::CancelHandle;

/// Outbound request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Serialized once with serde_json.
    Json(Value),
}

impl RequestBody {
    pub fn to_bytes(&self) -> Result<Option<Bytes>, AdapterError> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(value) => serde_json::to_vec(value)
                .map(|v| Some(Bytes::from(v)))
                .map_err(|e| AdapterError::JsonError(format!("failed to marshal request: {e}"))),
        }
    }
}

/// One outbound call.
#[derive(Debug, Clone)]
pub struct TransportCall {
    pub method: Method,
    /// Service name as configured in the manifest, e.g. `chat`.
    pub service: String,
    pub auth_info: Option<SecretString>,
    pub body: RequestBody,
    pub cancel: CancelHandle,
    pub request_id: String,
}

impl TransportCall {
    /// POST to `service` with the credentials and cancellation of `ctx`.
    pub fn post(ctx: &InvocationContext, service: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            service: service.into(),
            auth_info: ctx.auth_info.clone(),
            body,
            cancel: ctx.cancel.clone(),
            request_id: ctx.request_id.clone(),
        }
    }
}

/// Receiving half of a raw backend stream.
///
/// `data` closes when the backend is done or the transport gave up. An
/// error, if any, is sent before `data` closes.
#[derive(Debug)]
pub struct RawStream {
    pub data: mpsc::Receiver<Bytes>,
    pub errors: mpsc::Receiver<AdapterError>,
}

/// Sending half of a raw backend stream, owned by the transport task.
#[derive(Debug, Clone)]
pub struct RawStreamSender {
    data: mpsc::Sender<Bytes>,
    errors: mpsc::Sender<AdapterError>,
}

impl RawStream {
    pub fn channel() -> (RawStreamSender, RawStream) {
        let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
        let (err_tx, err_rx) = mpsc::channel(ERROR_CHANNEL_CAPACITY);
        (
            RawStreamSender {
                data: data_tx,
                errors: err_tx,
            },
            RawStream {
                data: data_rx,
                errors: err_rx,
            },
        )
    }

    /// A stream that fails immediately with `error`.
    pub fn failed(error: AdapterError) -> RawStream {
        let (tx, rx) = Self::channel();
        tx.fail(error);
        rx
    }
}

impl RawStreamSender {
    /// Push one fragment, waiting for capacity. Returns `false` once the
    /// receiving side is gone.
    pub async fn send(&self, fragment: Bytes) -> bool {
        self.data.send(fragment).await.is_ok()
    }

    /// Report the terminal error. Only the first one is kept.
    pub fn fail(&self, error: AdapterError) {
        if let Err(mpsc::error::TrySendError::Full(dropped)) = self.errors.try_send(error) {
            tracing::debug!(error = %dropped, "dropping secondary stream error");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.data.is_closed()
    }
}

/// Send requests to one backend.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Send and decode a single JSON response.
    async fn execute(&self, call: TransportCall) -> Result<Value, AdapterError>;

    /// Start a streaming request. Never blocks; failures arrive on the
    /// returned error channel.
    fn stream(&self, call: TransportCall) -> RawStream;
}
