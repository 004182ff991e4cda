use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::exchange::Exchange;
use super::{ResponsePolicy, StreamingHandler, UnaryHandler};
use crate::error::AdapterError;
use crate::execution::http::transport::TransportClient;
use crate::types::{InvocationContext, ServiceKind, StreamChunk};

/// Forwards `data` to the backend verbatim. The response is returned
/// unchanged unless a [`ResponsePolicy::Extract`] is set.
#[derive(Clone)]
pub struct PassthroughService {
    backend: String,
    service: ServiceKind,
    transport: Arc<dyn TransportClient>,
    policy: ResponsePolicy,
}

impl std::fmt::Debug for PassthroughService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassthroughService")
            .field("backend", &self.backend)
            .field("service", &self.service)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PassthroughService {
    pub fn new(
        backend: impl Into<String>,
        service: ServiceKind,
        transport: Arc<dyn TransportClient>,
    ) -> Self {
        Self {
            backend: backend.into(),
            service,
            transport,
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
impl UnaryHandler for PassthroughService {
    async fn handle_unary(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
    ) -> Result<Vec<u8>, AdapterError> {
        self.exchange()
            .unary(ctx, request, |data| data.clone(), &self.policy)
            .await
    }
}

#[async_trait]
impl StreamingHandler for PassthroughService {
    async fn handle_streaming(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
        out: mpsc::Sender<StreamChunk>,
    ) {
        self.exchange()
            .streaming(ctx, request, |data| data.clone(), out)
            .await
    }
}
