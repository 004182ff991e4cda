//! Ollama connection settings.

use aog_core::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_PORT: &str = "16677";
pub const DEFAULT_MODEL: &str = "qwen3:0.6b";

pub const CHAT_ENDPOINT: &str = "/api/chat";
pub const GENERATE_ENDPOINT: &str = "/api/generate";
pub const EMBED_ENDPOINT: &str = "/api/embeddings";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// `http` or `https`.
    pub scheme: String,
    /// `host:port` of the engine.
    pub host: String,
    /// Model reported to the orchestrator as the recommended default.
    pub default_model: String,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: format!("127.0.0.1:{DEFAULT_PORT}"),
            default_model: DEFAULT_MODEL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl OllamaConfig {
    /// Read `OLLAMA_SCHEME`, `OLLAMA_HOST`, `OLLAMA_PORT` and
    /// `OLLAMA_DEFAULT_MODEL`.
    pub fn from_env() -> Result<Self, AdapterError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AdapterError> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let scheme = var("OLLAMA_SCHEME").unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        let port = var("OLLAMA_PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let host = var("OLLAMA_HOST").unwrap_or_else(|| format!("127.0.0.1:{port}"));
        let default_model = var("OLLAMA_DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let config = Self {
            scheme,
            host,
            default_model,
            http: HttpConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(AdapterError::ConfigurationError(format!(
                "invalid scheme: {} (must be http or https)",
                self.scheme
            )));
        }
        if self.host.is_empty() {
            return Err(AdapterError::ConfigurationError(
                "Ollama host cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Transport settings for the three Ollama endpoints.
    pub fn transport_config(&self) -> TransportConfig {
        let service = |name: ServiceKind, endpoint: &str| {
            ServiceConfig::new(name.as_str(), endpoint).with_default_model(&self.default_model)
        };
        TransportConfig::new(self.base_url())
            .with_service(service(ServiceKind::Chat, CHAT_ENDPOINT))
            .with_service(service(ServiceKind::Generate, GENERATE_ENDPOINT))
            .with_service(service(ServiceKind::Embed, EMBED_ENDPOINT))
            .with_stream_format(StreamFormat::JsonLines)
            .with_http_config(self.http.clone())
    }
}
