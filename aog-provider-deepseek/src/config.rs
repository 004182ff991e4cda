//! DeepSeek endpoint settings.

use aog_core::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const CHAT_ENDPOINT: &str = "/chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    pub base_url: String,
    /// Service entries from the plugin manifest.
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            services: vec![
                ServiceConfig::new(ServiceKind::Chat.as_str(), CHAT_ENDPOINT)
                    .with_auth_type(AuthType::ApiKey)
                    .with_default_model("deepseek-chat"),
            ],
            http: HttpConfig::default(),
        }
    }
}

impl DeepSeekConfig {
    /// Defaults with the base URL overridden by `DEEPSEEK_BASE_URL`.
    pub fn from_env() -> Self {
        match std::env::var("DEEPSEEK_BASE_URL") {
            Ok(url) if !url.is_empty() => Self::default().with_base_url(url),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add a service entry, replacing any entry with the same name.
    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.services.retain(|s| s.service_name != service.service_name);
        self.services.push(service);
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn transport_config(&self) -> TransportConfig {
        let mut transport = TransportConfig::new(self.base_url.trim_end_matches('/'))
            .with_stream_format(StreamFormat::Sse)
            .with_http_config(self.http.clone());
        transport.services = self.services.clone();
        transport
    }
}
