//! Request authentication.
//!
//! One authenticator per [`AuthType`]. Authenticators run after all other
//! headers are set and before any network I/O; a failure aborts the call.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::config::{AuthType, ServiceConfig};
use crate::error::AdapterError;
use crate::signing::{SigningContext, Tc3Credentials, sign};

/// The parts of an outbound request an authenticator may inspect.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub body: &'a [u8],
    pub service: &'a ServiceConfig,
    pub auth_info: Option<&'a SecretString>,
}

pub trait RequestAuthenticator: Send + Sync {
    fn authenticate(&self, req: AuthRequest<'_>, headers: &mut HeaderMap)
    -> Result<(), AdapterError>;
}

/// Leaves the request untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl RequestAuthenticator for NoAuth {
    fn authenticate(&self, _: AuthRequest<'_>, _: &mut HeaderMap) -> Result<(), AdapterError> {
        Ok(())
    }
}

/// `Authorization: Bearer <api_key>` from `{"api_key": "..."}`.
///
/// A payload without `api_key` sends no header; an unparsable payload fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerApiKey;

impl RequestAuthenticator for BearerApiKey {
    fn authenticate(
        &self,
        req: AuthRequest<'_>,
        headers: &mut HeaderMap,
    ) -> Result<(), AdapterError> {
        let raw = req.auth_info.map(|s| s.expose_secret()).unwrap_or_default();
        let credentials: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| {
                AdapterError::AuthenticationError(format!(
                    "failed to unmarshal request credentials: {e}"
                ))
            })?;
        if let Some(key) = credentials
            .get("api_key")
            .and_then(|v| v.as_str())
            .filter(|k| !k.is_empty())
        {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                AdapterError::AuthenticationError(format!("Invalid API key format: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// TC3-HMAC-SHA256 signing from `{"secret_id": "...", "secret_key": "..."}`,
/// with `version`/`action`/`region` taken from the service's `extra_headers`.
#[derive(Clone)]
pub struct Tc3Authenticator {
    clock: Clock,
}

impl std::fmt::Debug for Tc3Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tc3Authenticator").finish_non_exhaustive()
    }
}

impl Default for Tc3Authenticator {
    fn default() -> Self {
        Self {
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }
}

impl Tc3Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` (unix seconds) instead of the system time.
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }
}

impl RequestAuthenticator for Tc3Authenticator {
    fn authenticate(
        &self,
        req: AuthRequest<'_>,
        headers: &mut HeaderMap,
    ) -> Result<(), AdapterError> {
        let raw = req.auth_info.map(|s| s.expose_secret()).unwrap_or_default();
        let credentials = Tc3Credentials::from_auth_info(raw)?;
        let params = req.service.tencent_params()?;
        let signed = sign(&SigningContext {
            credentials: &credentials,
            method: req.method,
            url: req.url,
            body: req.body,
            headers,
            params: &params,
            timestamp: (self.clock)(),
        })?;
        signed.apply(headers)
    }
}

/// Default authenticator for an auth type.
pub fn authenticator_for(auth_type: AuthType) -> Arc<dyn RequestAuthenticator> {
    match auth_type {
        AuthType::None => Arc::new(NoAuth),
        AuthType::ApiKey => Arc::new(BearerApiKey),
        AuthType::Sign => Arc::new(Tc3Authenticator::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    fn request<'a>(
        service: &'a ServiceConfig,
        auth_info: Option<&'a SecretString>,
    ) -> AuthRequest<'a> {
        AuthRequest {
            method: "POST",
            url: "https://hunyuan.tencentcloudapi.com",
            body: b"{}",
            service,
            auth_info,
        }
    }

    #[test]
    fn bearer_sets_authorization_from_api_key() {
        let svc = ServiceConfig::new("chat", "/chat").with_auth_type(AuthType::ApiKey);
        let secret = SecretString::from(r#"{"api_key":"sk-test"}"#);
        let mut headers = HeaderMap::new();
        BearerApiKey
            .authenticate(request(&svc, Some(&secret)), &mut headers)
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
    }

    #[test]
    fn bearer_without_key_sends_nothing() {
        let svc = ServiceConfig::new("chat", "/chat");
        let secret = SecretString::from("{}");
        let mut headers = HeaderMap::new();
        BearerApiKey
            .authenticate(request(&svc, Some(&secret)), &mut headers)
            .unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn bearer_rejects_missing_or_malformed_payload() {
        let svc = ServiceConfig::new("chat", "/chat");
        let mut headers = HeaderMap::new();
        assert!(matches!(
            BearerApiKey.authenticate(request(&svc, None), &mut headers),
            Err(AdapterError::AuthenticationError(_))
        ));
        let secret = SecretString::from("api_key=sk");
        assert!(
            BearerApiKey
                .authenticate(request(&svc, Some(&secret)), &mut headers)
                .is_err()
        );
    }

    #[test]
    fn tc3_uses_injected_clock_and_service_params() {
        let svc = ServiceConfig::new("chat", "")
            .with_auth_type(AuthType::Sign)
            .with_extra_headers(
                r#"{"version":"2023-09-01","action":"ChatCompletions","region":"ap-guangzhou"}"#,
            );
        let secret = SecretString::from(
            r#"{"secret_id":"AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE","secret_key":"Gu5t9xGARNpq86cd98joQYCN3EXAMPLE"}"#,
        );
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Tc3Authenticator::with_clock(|| 1_700_000_000)
            .authenticate(request(&svc, Some(&secret)), &mut headers)
            .unwrap();

        assert_eq!(headers.get("x-tc-timestamp").unwrap(), "1700000000");
        assert_eq!(headers.get("x-tc-action").unwrap(), "ChatCompletions");
        assert_eq!(headers.get("x-tc-version").unwrap(), "2023-09-01");
        assert!(
            headers
                .get(AUTHORIZATION)
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("Signature=f78455a233e5d381389872f446859c903a8153f96d676cf2a706ba737d06b2bd")
        );
    }

    #[test]
    fn tc3_failure_leaves_headers_untouched() {
        let svc = ServiceConfig::new("chat", "").with_auth_type(AuthType::Sign);
        let secret = SecretString::from("{not json");
        let mut headers = HeaderMap::new();
        let err = Tc3Authenticator::new()
            .authenticate(request(&svc, Some(&secret)), &mut headers)
            .unwrap_err();
        assert!(matches!(err, AdapterError::SigningError(_)));
        assert!(headers.is_empty());
    }
}
