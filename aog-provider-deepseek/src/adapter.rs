use std::sync::Arc;

use aog_core::execution::http::HttpTransport;
use aog_core::handlers::PassthroughService;
use aog_core::prelude::*;
use tracing::debug;

use crate::BACKEND_ID;
use crate::config::DeepSeekConfig;

/// DeepSeek backend adapter.
#[derive(Debug, Clone)]
pub struct DeepSeekAdapter {
    services: Arc<ServiceTable>,
}

impl DeepSeekAdapter {
    pub fn new(config: DeepSeekConfig) -> Result<Self, AdapterError> {
        let transport = HttpTransport::new(config.transport_config())?;
        debug!(backend = BACKEND_ID, base_url = %config.base_url, "DeepSeek adapter ready");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn TransportClient>) -> Self {
        let chat = PassthroughService::new(BACKEND_ID, ServiceKind::Chat, transport);
        let table = ServiceTable::new(BACKEND_ID).register(ServiceKind::Chat, ServiceHandlers::both(chat));
        Self {
            services: Arc::new(table),
        }
    }
}

impl BackendAdapter for DeepSeekAdapter {
    fn backend_id(&self) -> &str {
        BACKEND_ID
    }

    fn services(&self) -> &Arc<ServiceTable> {
        &self.services
    }
}
