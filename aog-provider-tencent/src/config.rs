//! Tencent Cloud endpoint settings.

use aog_core::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "ap-guangzhou";
pub const HUNYUAN_URL: &str = "https://hunyuan.tencentcloudapi.com";
pub const AIART_URL: &str = "https://aiart.tencentcloudapi.com";

fn common_params(version: &str, action: &str, region: &str) -> String {
    serde_json::json!({ "version": version, "action": action, "region": region }).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TencentConfig {
    pub base_url: String,
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for TencentConfig {
    fn default() -> Self {
        Self::for_region(DEFAULT_REGION)
    }
}

impl TencentConfig {
    /// Default chat and text-to-image entries signed for `region`.
    pub fn for_region(region: &str) -> Self {
        Self {
            base_url: HUNYUAN_URL.to_string(),
            services: vec![
                ServiceConfig::new(ServiceKind::Chat.as_str(), "")
                    .with_auth_type(AuthType::Sign)
                    .with_special_url(HUNYUAN_URL)
                    .with_extra_headers(common_params("2023-09-01", "ChatCompletions", region))
                    .with_default_model("hunyuan-lite"),
                ServiceConfig::new(ServiceKind::TextToImage.as_str(), "")
                    .with_auth_type(AuthType::Sign)
                    .with_special_url(AIART_URL)
                    .with_extra_headers(common_params("2022-12-29", "TextToImageLite", region)),
            ],
            http: HttpConfig::default(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_carry_signing_parameters() {
        let config = TencentConfig::for_region("ap-shanghai");
        let transport = config.transport_config();

        let chat = transport.service("chat").unwrap();
        let params = chat.tencent_params().unwrap();
        assert_eq!(params.action, "ChatCompletions");
        assert_eq!(params.region, "ap-shanghai");
        assert_eq!(transport.resolve_url(chat), HUNYUAN_URL);

        let image = transport.service("text-to-image").unwrap();
        assert_eq!(image.auth_type, AuthType::Sign);
        assert_eq!(image.tencent_params().unwrap().version, "2022-12-29");
    }
}
