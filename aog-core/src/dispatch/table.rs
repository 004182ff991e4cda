//! Service table: capability declaration plus handler lookup.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::defaults::streaming::OUTPUT_CHANNEL_CAPACITY;
use crate::error::AdapterError;
use crate::handlers::{StreamingHandler, UnaryHandler};
use crate::types::{InvocationContext, ServiceKind, StreamChunk};

/// Call modes a service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchCapability {
    Unary,
    Streaming,
    Both,
}

impl DispatchCapability {
    pub fn supports_unary(self) -> bool {
        matches!(self, Self::Unary | Self::Both)
    }

    pub fn supports_streaming(self) -> bool {
        matches!(self, Self::Streaming | Self::Both)
    }
}

/// Handlers registered for one service.
#[derive(Clone)]
pub enum ServiceHandlers {
    Unary(Arc<dyn UnaryHandler>),
    Streaming(Arc<dyn StreamingHandler>),
    Both {
        unary: Arc<dyn UnaryHandler>,
        streaming: Arc<dyn StreamingHandler>,
    },
}

impl std::fmt::Debug for ServiceHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ServiceHandlers")
            .field(&self.capability())
            .finish()
    }
}

impl ServiceHandlers {
    pub fn unary<H: UnaryHandler + 'static>(handler: H) -> Self {
        Self::Unary(Arc::new(handler))
    }

    /// Register one handler for both modes.
    pub fn both<H>(handler: H) -> Self
    where
        H: UnaryHandler + StreamingHandler + 'static,
    {
        let handler = Arc::new(handler);
        Self::Both {
            unary: handler.clone(),
            streaming: handler,
        }
    }

    pub fn capability(&self) -> DispatchCapability {
        match self {
            Self::Unary(_) => DispatchCapability::Unary,
            Self::Streaming(_) => DispatchCapability::Streaming,
            Self::Both { .. } => DispatchCapability::Both,
        }
    }

    fn unary_handler(&self) -> Option<&Arc<dyn UnaryHandler>> {
        match self {
            Self::Unary(h) | Self::Both { unary: h, .. } => Some(h),
            Self::Streaming(_) => None,
        }
    }

    fn streaming_handler(&self) -> Option<&Arc<dyn StreamingHandler>> {
        match self {
            Self::Streaming(h) | Self::Both { streaming: h, .. } => Some(h),
            Self::Unary(_) => None,
        }
    }
}

/// Maps each offered service to its handlers.
#[derive(Debug, Clone)]
pub struct ServiceTable {
    backend: String,
    entries: BTreeMap<ServiceKind, ServiceHandlers>,
}

impl ServiceTable {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn register(mut self, service: ServiceKind, handlers: ServiceHandlers) -> Self {
        self.entries.insert(service, handlers);
        self
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn capability(&self, service: ServiceKind) -> Option<DispatchCapability> {
        self.entries.get(&service).map(ServiceHandlers::capability)
    }

    pub fn capabilities(&self) -> Vec<(ServiceKind, DispatchCapability)> {
        self.entries
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.capability()))
            .collect()
    }

    fn lookup(&self, service: &str) -> Result<(ServiceKind, &ServiceHandlers), AdapterError> {
        let kind: ServiceKind = service.parse()?;
        self.entries
            .get(&kind)
            .map(|h| (kind, h))
            .ok_or_else(|| AdapterError::UnsupportedService(service.to_string()))
    }

    /// Route a unary call.
    pub async fn invoke_unary(
        &self,
        ctx: &InvocationContext,
        service: &str,
        request: &[u8],
    ) -> Result<Vec<u8>, AdapterError> {
        info!(
            request_id = %ctx.request_id,
            backend = %self.backend,
            service,
            "Invoking service (unary)"
        );
        let handler = self
            .lookup(service)
            .and_then(|(kind, handlers)| {
                handlers.unary_handler().cloned().ok_or_else(|| {
                    AdapterError::UnsupportedOperation(format!(
                        "service {kind} does not support unary calls"
                    ))
                })
            })
            .map_err(|e| e.in_service(self.backend.as_str(), service))
            .inspect_err(|e| {
                error!(request_id = %ctx.request_id, error = %e, "Unary dispatch failed");
            })?;
        handler.handle_unary(ctx, request).await
    }

    /// Route a streaming call, writing into `out` until one terminal chunk.
    pub async fn stream_into(
        &self,
        ctx: &InvocationContext,
        service: &str,
        request: &[u8],
        out: mpsc::Sender<StreamChunk>,
    ) {
        info!(
            request_id = %ctx.request_id,
            backend = %self.backend,
            service,
            "Invoking service (streaming)"
        );
        let handler = self.lookup(service).and_then(|(kind, handlers)| {
            handlers.streaming_handler().cloned().ok_or_else(|| {
                AdapterError::UnsupportedOperation(format!(
                    "service {kind} does not support streaming"
                ))
            })
        });
        match handler.map_err(|e| e.in_service(self.backend.as_str(), service)) {
            Ok(handler) => handler.handle_streaming(ctx, request, out).await,
            Err(e) => {
                error!(request_id = %ctx.request_id, error = %e, "Streaming dispatch failed");
                let _ = out.send(StreamChunk::error_chunk(e)).await;
            }
        }
    }

    /// Route a streaming call on its own task and return the chunk receiver.
    pub fn invoke_streaming(
        self: &Arc<Self>,
        ctx: InvocationContext,
        service: impl Into<String>,
        request: Vec<u8>,
    ) -> mpsc::Receiver<StreamChunk> {
        let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        let table = Arc::clone(self);
        let service = service.into();
        tokio::spawn(async move {
            table.stream_into(&ctx, &service, &request, tx).await;
        });
        rx
    }
}
