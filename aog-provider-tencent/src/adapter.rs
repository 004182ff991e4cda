use std::sync::Arc;

use aog_core::execution::http::HttpTransport;
use aog_core::handlers::{ExtractSpec, PassthroughService, ResponsePolicy};
use aog_core::prelude::*;
use tracing::debug;

use crate::BACKEND_ID;
use crate::config::TencentConfig;

/// Fields kept from a unary chat response.
pub fn chat_response_policy() -> ResponsePolicy {
    ResponsePolicy::Extract(
        ExtractSpec::new(["message", "model"]).with_usage("prompt_eval_count", "eval_count"),
    )
}

/// Tencent Hunyuan backend adapter.
#[derive(Debug, Clone)]
pub struct TencentAdapter {
    services: Arc<ServiceTable>,
}

impl TencentAdapter {
    pub fn new(config: TencentConfig) -> Result<Self, AdapterError> {
        let transport = HttpTransport::new(config.transport_config())?;
        debug!(backend = BACKEND_ID, services = config.services.len(), "Tencent adapter ready");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn TransportClient>) -> Self {
        let chat = PassthroughService::new(BACKEND_ID, ServiceKind::Chat, transport.clone())
            .with_policy(chat_response_policy());
        let text_to_image = PassthroughService::new(BACKEND_ID, ServiceKind::TextToImage, transport);
        let table = ServiceTable::new(BACKEND_ID)
            .register(ServiceKind::Chat, ServiceHandlers::both(chat))
            .register(ServiceKind::TextToImage, ServiceHandlers::unary(text_to_image));
        Self {
            services: Arc::new(table),
        }
    }
}

impl BackendAdapter for TencentAdapter {
    fn backend_id(&self) -> &str {
        BACKEND_ID
    }

    fn services(&self) -> &Arc<ServiceTable> {
        &self.services
    }
}
