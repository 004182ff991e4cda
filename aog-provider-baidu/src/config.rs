//! Qianfan endpoint settings.
//!
//! Only `chat` and `embed` have built-in endpoints. `text-to-speech` and
//! `image-to-image` must be supplied from the plugin manifest with
//! [`BaiduConfig::with_service`]; until then calls to them fail with a
//! configuration error.

use aog_core::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://qianfan.baidubce.com";
pub const CHAT_ENDPOINT: &str = "/v2/chat/completions";
pub const EMBED_ENDPOINT: &str = "/v2/embeddings";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaiduConfig {
    pub base_url: String,
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for BaiduConfig {
    fn default() -> Self {
        let api_key = |kind: ServiceKind, endpoint: &str| {
            ServiceConfig::new(kind.as_str(), endpoint).with_auth_type(AuthType::ApiKey)
        };
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            services: vec![
                api_key(ServiceKind::Chat, CHAT_ENDPOINT).with_default_model("ernie-4.0-8k"),
                api_key(ServiceKind::Embed, EMBED_ENDPOINT).with_default_model("embedding-v1"),
            ],
            http: HttpConfig::default(),
        }
    }
}

impl BaiduConfig {
    /// Defaults with the base URL overridden by `BAIDU_BASE_URL`.
    pub fn from_env() -> Self {
        match std::env::var("BAIDU_BASE_URL") {
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
