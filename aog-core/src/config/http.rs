//! reqwest client configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::AdapterError;

/// Client settings shared by every service of one backend.
///
/// Has no whole-request timeout; calls are bounded through cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Sent on every request, before per-service extra headers.
    pub headers: HashMap<String, String>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    /// Ask for `Accept-Encoding: identity` on streaming calls.
    pub stream_disable_compression: bool,
}

/// Builder for [`HttpConfig`]. Unset fields keep their defaults.
#[derive(Debug, Clone)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl Default for HttpConfigBuilder {
    fn default() -> Self {
        Self {
            config: HttpConfig::default(),
        }
    }
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Wait on connects for as long as the OS allows.
    pub fn no_connect_timeout(mut self) -> Self {
        self.config.connect_timeout = None;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn stream_disable_compression(mut self, disable: bool) -> Self {
        self.config.stream_disable_compression = disable;
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }

    /// Build a reqwest client from this configuration.
    pub fn build_client(&self) -> Result<reqwest::Client, AdapterError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| AdapterError::ConfigurationError(format!("Invalid proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if !self.headers.is_empty() {
            builder = builder.default_headers(crate::execution::http::headers::header_map(
                self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            )?);
        }
        builder
            .build()
            .map_err(|e| AdapterError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
    }
}

/// Unset means `default`; any value other than a falsy one means `true`.
fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name).map_or(default, |val| {
        !matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "off" | "no"
        )
    })
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(crate::defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(crate::defaults::http::USER_AGENT.to_string()),
            stream_disable_compression: env_flag("AOG_STREAM_DISABLE_COMPRESSION", true),
        }
    }
}

mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_defaults_for_unset_fields() {
        let cfg = HttpConfig::builder()
            .header("X-Trace", "1")
            .stream_disable_compression(false)
            .build();
        assert_eq!(cfg.connect_timeout, Some(crate::defaults::http::CONNECT_TIMEOUT));
        assert_eq!(cfg.user_agent.as_deref(), Some(crate::defaults::http::USER_AGENT));
        assert_eq!(cfg.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert!(!cfg.stream_disable_compression);
    }

    #[test]
    fn duration_serializes_as_seconds() {
        let cfg = HttpConfig::builder()
            .connect_timeout(Duration::from_secs(3))
            .build();
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["connect_timeout"], serde_json::json!(3));

        let cfg = HttpConfig::builder().no_connect_timeout().build();
        let back: HttpConfig =
            serde_json::from_value(serde_json::to_value(&cfg).unwrap()).unwrap();
        assert_eq!(back.connect_timeout, None);
    }

    #[test]
    fn partial_object_fills_in_defaults() {
        let cfg: HttpConfig =
            serde_json::from_value(serde_json::json!({ "proxy": "http://127.0.0.1:3128" })).unwrap();
        assert_eq!(cfg.proxy.as_deref(), Some("http://127.0.0.1:3128"));
        assert_eq!(cfg.connect_timeout, Some(crate::defaults::http::CONNECT_TIMEOUT));
        assert_eq!(cfg.user_agent.as_deref(), Some(crate::defaults::http::USER_AGENT));
        assert!(cfg.headers.is_empty());
    }

    #[test]
    fn invalid_proxy_is_configuration_error() {
        let cfg = HttpConfig::builder().proxy("::not a url::").build();
        assert!(matches!(
            cfg.build_client(),
            Err(AdapterError::ConfigurationError(_))
        ));
    }
}
