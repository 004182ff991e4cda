//! Service Handlers
//!
//! Per-capability translation between the normalized request/response
//! schema and a backend's native schema.
//!
//! - [`MappedService`]: renames/forwards recognized fields and applies a
//!   [`ResponsePolicy`]
//! - [`PassthroughService`]: forwards `data` verbatim and returns the backend
//!   payload unchanged

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AdapterError;
use crate::types::{InvocationContext, StreamChunk};

pub mod mapped;
#[cfg(test)]
pub(crate) mod mock;
pub mod mapping;
pub mod passthrough;
pub mod response;

pub use mapped::MappedService;
pub use mapping::{FieldMapping, FieldRule};
pub use passthrough::PassthroughService;
pub use response::{ExtractSpec, ResponsePolicy, UsageFields};

/// Single request, single response.
#[async_trait]
pub trait UnaryHandler: Send + Sync {
    /// Returns the encoded `{data}` response. Bounded by `ctx.cancel`.
    async fn handle_unary(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
    ) -> Result<Vec<u8>, AdapterError>;
}

/// Streamed response.
#[async_trait]
pub trait StreamingHandler: Send + Sync {
    /// Writes chunks to `out` up to and including exactly one terminal chunk.
    async fn handle_streaming(
        &self,
        ctx: &InvocationContext,
        request: &[u8],
        out: mpsc::Sender<StreamChunk>,
    );
}

pub(crate) mod exchange {
    //! Request/response plumbing shared by the generic handlers.

    use serde_json::Value;
    use tokio::sync::mpsc;
    use tracing::debug;

    use super::ResponsePolicy;
    use crate::error::AdapterError;
    use crate::execution::http::transport::{RawStream, RequestBody, TransportCall, TransportClient};
    use crate::streaming::StreamBridge;
    use crate::types::{
        Document, InvocationContext, ServiceKind, ServiceRequest, ServiceResponse, StreamChunk,
    };

    pub(crate) struct Exchange<'a> {
        pub backend: &'a str,
        pub service: ServiceKind,
        pub transport: &'a dyn TransportClient,
    }

    impl Exchange<'_> {
        pub(crate) async fn unary(
            &self,
            ctx: &InvocationContext,
            request: &[u8],
            build: impl FnOnce(&Document) -> Document,
            policy: &ResponsePolicy,
        ) -> Result<Vec<u8>, AdapterError> {
            debug!(
                request_id = %ctx.request_id,
                backend = self.backend,
                service = %self.service,
                "Forwarding unary request"
            );
            let result = async {
                let req = ServiceRequest::decode(request)?;
                let body = Value::Object(build(&req.data));
                let call = TransportCall::post(ctx, self.service.as_str(), RequestBody::Json(body));
                let response = self.transport.execute(call).await?;
                ServiceResponse::from_data(policy.apply(response)?).encode()
            }
            .await;
            match &result {
                Ok(_) => debug!(request_id = %ctx.request_id, "service completed"),
                Err(e) => tracing::error!(request_id = %ctx.request_id, error = %e, "service failed"),
            }
            result.map_err(|e| e.in_service(self.backend, self.service.as_str()))
        }

        pub(crate) async fn streaming(
            &self,
            ctx: &InvocationContext,
            request: &[u8],
            build: impl FnOnce(&Document) -> Document,
            out: mpsc::Sender<StreamChunk>,
        ) {
            debug!(
                request_id = %ctx.request_id,
                backend = self.backend,
                service = %self.service,
                "Forwarding streaming request"
            );
            let raw = match ServiceRequest::decode(request) {
                Ok(req) => {
                    let body = Value::Object(build(&req.data));
                    self.transport.stream(TransportCall::post(
                        ctx,
                        self.service.as_str(),
                        RequestBody::Json(body),
                    ))
                }
                Err(e) => RawStream::failed(e),
            };
            StreamBridge::new(self.backend, self.service.as_str())
                .with_request_id(ctx.request_id.clone())
                .run(raw, ctx.cancel.clone(), out)
                .await;
        }
    }
}
