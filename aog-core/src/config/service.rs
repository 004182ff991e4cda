//! Per-service endpoint configuration.

use serde::{Deserialize, Serialize};

use super::http::HttpConfig;
use crate::error::AdapterError;

/// How requests to a service are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    #[serde(alias = "")]
    None,
    /// `Authorization: Bearer <api_key>`
    #[serde(alias = "api_key")]
    ApiKey,
    /// TC3-HMAC-SHA256 request signing
    Sign,
}

/// Wire framing of a backend's streaming responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamFormat {
    /// One JSON document per line.
    #[default]
    JsonLines,
    /// Server-sent events with `data:` lines, terminated by `[DONE]`.
    Sse,
}

/// One entry of a plugin manifest's `services` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub auth_type: AuthType,
    /// Full URL overriding `base_url + endpoint`.
    #[serde(default)]
    pub special_url: String,
    /// JSON object encoded as a string; `"{}"` or empty means none.
    #[serde(default = "empty_object")]
    pub extra_headers: String,
    #[serde(default)]
    pub default_model: String,
    #[serde(default)]
    pub support_models: Vec<String>,
}

fn empty_object() -> String {
    "{}".to_string()
}

impl ServiceConfig {
    pub fn new(service_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            endpoint: endpoint.into(),
            auth_type: AuthType::None,
            special_url: String::new(),
            extra_headers: empty_object(),
            default_model: String::new(),
            support_models: Vec::new(),
        }
    }

    pub fn with_auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    pub fn with_special_url(mut self, url: impl Into<String>) -> Self {
        self.special_url = url.into();
        self
    }

    pub fn with_extra_headers(mut self, extra_headers: impl Into<String>) -> Self {
        self.extra_headers = extra_headers.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn has_extra_headers(&self) -> bool {
        let raw = self.extra_headers.trim();
        !(raw.is_empty() || raw == "{}")
    }

    /// String-valued entries of `extra_headers`. Non-string values are skipped.
    pub fn extra_header_pairs(&self) -> Result<Vec<(String, String)>, AdapterError> {
        if !self.has_extra_headers() {
            return Ok(Vec::new());
        }
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&self.extra_headers).map_err(|e| {
                AdapterError::ConfigurationError(format!("failed to parse extra headers: {e}"))
            })?;
        Ok(parsed
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect())
    }

    /// Common signing parameters carried in `extra_headers`.
    pub fn tencent_params(&self) -> Result<TencentCommonParams, AdapterError> {
        if !self.has_extra_headers() {
            return Ok(TencentCommonParams::default());
        }
        serde_json::from_str(&self.extra_headers)
            .map_err(|e| AdapterError::SigningError(format!("invalid common params: {e}")))
    }
}

/// `X-TC-Version` / `X-TC-Action` / `X-TC-Region` values for a signed service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TencentCommonParams {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub region: String,
}

/// Everything a transport needs to reach one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub base_url: String,
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub stream_format: StreamFormat,
    #[serde(default)]
    pub http: HttpConfig,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            services: Vec::new(),
            stream_format: StreamFormat::default(),
            http: HttpConfig::default(),
        }
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_stream_format(mut self, format: StreamFormat) -> Self {
        self.stream_format = format;
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn service(&self, name: &str) -> Result<&ServiceConfig, AdapterError> {
        self.services
            .iter()
            .find(|s| s.service_name == name)
            .ok_or_else(|| {
                AdapterError::ConfigurationError(format!("no endpoint configured for service {name}"))
            })
    }

    /// `special_url` when set, otherwise `base_url + endpoint`.
    pub fn resolve_url(&self, service: &ServiceConfig) -> String {
        if service.special_url.is_empty() {
            format!("{}{}", self.base_url, service.endpoint)
        } else {
            service.special_url.clone()
        }
    }
}
