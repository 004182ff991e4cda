use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{DispatchCapability, ServiceTable};
use crate::error::AdapterError;
use crate::types::{InvocationContext, ServiceKind, StreamChunk};

/// A backend adapter as seen by the orchestrator.
///
/// Implementors only provide their identity and service table; routing
/// comes from the table.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn backend_id(&self) -> &str;

    fn services(&self) -> &Arc<ServiceTable>;

    fn capabilities(&self) -> Vec<(ServiceKind, DispatchCapability)> {
        self.services().capabilities()
    }

    fn capability(&self, service: ServiceKind) -> Option<DispatchCapability> {
        self.services().capability(service)
    }

    async fn invoke_service(
        &self,
        ctx: &InvocationContext,
        service: &str,
        request: &[u8],
    ) -> Result<Vec<u8>, AdapterError> {
        self.services().invoke_unary(ctx, service, request).await
    }

    fn invoke_service_stream(
        &self,
        ctx: InvocationContext,
        service: &str,
        request: Vec<u8>,
    ) -> mpsc::Receiver<StreamChunk> {
        self.services().invoke_streaming(ctx, service, request)
    }
}
