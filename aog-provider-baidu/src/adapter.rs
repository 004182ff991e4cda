use std::sync::Arc;

use aog_core::execution::http::HttpTransport;
use aog_core::handlers::PassthroughService;
use aog_core::prelude::*;
use tracing::debug;

use crate::BACKEND_ID;
use crate::config::BaiduConfig;

/// Services offered by Baidu and how they may be called.
pub const SERVICES: [(ServiceKind, DispatchCapability); 4] = [
    (ServiceKind::Chat, DispatchCapability::Both),
    (ServiceKind::Embed, DispatchCapability::Unary),
    (ServiceKind::TextToSpeech, DispatchCapability::Unary),
    (ServiceKind::ImageToImage, DispatchCapability::Unary),
];

/// Baidu Qianfan backend adapter.
#[derive(Debug, Clone)]
pub struct BaiduAdapter {
    services: Arc<ServiceTable>,
}

impl BaiduAdapter {
    pub fn new(config: BaiduConfig) -> Result<Self, AdapterError> {
        let transport = HttpTransport::new(config.transport_config())?;
        debug!(backend = BACKEND_ID, base_url = %config.base_url, "Baidu adapter ready");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn TransportClient>) -> Self {
        let table = SERVICES
            .into_iter()
            .fold(ServiceTable::new(BACKEND_ID), |table, (kind, capability)| {
                let service = PassthroughService::new(BACKEND_ID, kind, transport.clone());
                let handlers = match capability {
                    DispatchCapability::Unary => ServiceHandlers::unary(service),
                    _ => ServiceHandlers::both(service),
                };
                table.register(kind, handlers)
            });
        Self {
            services: Arc::new(table),
        }
    }
}

impl BackendAdapter for BaiduAdapter {
    fn backend_id(&self) -> &str {
        BACKEND_ID
    }

    fn services(&self) -> &Arc<ServiceTable> {
        &self.services
    }
}
