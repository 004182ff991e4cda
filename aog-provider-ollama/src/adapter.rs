use std::sync::Arc;

use aog_core::execution::http::HttpTransport;
use aog_core::prelude::*;
use tracing::debug;

use crate::config::OllamaConfig;
use crate::{BACKEND_ID, services};

/// Ollama backend adapter.
#[derive(Debug, Clone)]
pub struct OllamaAdapter {
    config: OllamaConfig,
    services: Arc<ServiceTable>,
}

impl OllamaAdapter {
    pub fn new(config: OllamaConfig) -> Result<Self, AdapterError> {
        config.validate()?;
        let transport = HttpTransport::new(config.transport_config())?;
        debug!(backend = BACKEND_ID, base_url = %config.base_url(), "Ollama adapter ready");
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn from_env() -> Result<Self, AdapterError> {
        Self::new(OllamaConfig::from_env()?)
    }

    /// Use a caller-provided transport.
    pub fn with_transport(config: OllamaConfig, transport: Arc<dyn TransportClient>) -> Self {
        Self {
            config,
            services: Arc::new(services::service_table(transport)),
        }
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

impl BackendAdapter for OllamaAdapter {
    fn backend_id(&self) -> &str {
        BACKEND_ID
    }

    fn services(&self) -> &Arc<ServiceTable> {
        &self.services
    }
}
