use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::exchange::Exchange;
use super::{FieldMapping, ResponsePolicy, StreamingHandler, UnaryHandler};
use crate::error::AdapterError;
use crate::execution::http::transport::TransportClient;
use crate::types::{InvocationContext, ServiceKind, StreamChunk};

/// A service whose request body is built by a [`FieldMapping`] and whose
/// response goes through a [`ResponsePolicy`].
#[derive(Clone)]
pub struct MappedService {
    backend: String,
    service: ServiceKind,
    transport: Arc<dyn TransportClient>,
    mapping: FieldMapping,
    policy: ResponsePolicy,
}

impl std::fmt::Debug for MappedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedService")
            .field("backend", &self.backend)
            .field("service", &self.service)
            .field("mapping", &self.mapping)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl MappedService {
    pub fn new(
        backend: impl Into<String>,
        service: ServiceKind,
        transport: Arc<dyn TransportClient>,
        mapping: FieldMapping,
    ) -> Self {
        Self {
            backend: backend.into(),
            service,
            transport,
            mapping,
            policy: ResponsePolicy::Passthrough,
        }
    }

    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn exchange(&self) -> Exchange<'_> {
        Exchange {
            backend: &self.backend,
            service: self.service,
            transport: self.transport.as_ref(),
        }
    }
}

#[async_trait]
impl UnaryHandler for MappedService {
    async fn handle_unary(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
    ) -> Result<Vec<u8>, AdapterError> {
        self.exchange()
            .unary(ctx, request, |data| self.mapping.apply(data, false), &self.policy)
            .await
    }
}

#[async_trait]
impl StreamingHandler for MappedService {
    async fn handle_streaming(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
        out: mpsc::Sender<StreamChunk>,
    ) {
        self.exchange()
            .streaming(ctx, request, |data| self.mapping.apply(data, true), out)
            .await
    }
}
