//! TC3-HMAC-SHA256 canonical request signing.
//!
//! The steps and their order are fixed by the backend:
//! canonical request, credential scope, string to sign, HMAC key chain,
//! hex signature, then the `Authorization` and `X-TC-*` headers.

use hmac::{Hmac, Mac};
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::TencentCommonParams;
use crate::error::AdapterError;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
const TERMINATOR: &str = "tc3_request";

/// Headers (besides `host`) that take part in the canonical request, in order.
///
/// The backend only expects `content-type`. Anything added here must also be
/// accepted by the backend's verifier.
const SIGNED_HEADERS: &[&str] = &["content-type"];

/// `secret_id` / `secret_key` pair from the call's auth payload.
#[derive(Debug, Clone)]
pub struct Tc3Credentials {
    pub secret_id: String,
    pub secret_key: SecretString,
}

#[derive(Deserialize)]
struct RawCredentials {
    #[serde(default)]
    secret_id: String,
    #[serde(default)]
    secret_key: String,
}

impl Tc3Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Parse `{"secret_id": "...", "secret_key": "..."}`.
    pub fn from_auth_info(auth_info: &str) -> Result<Self, AdapterError> {
        let raw: RawCredentials = serde_json::from_str(auth_info).map_err(|e| {
            AdapterError::SigningError(format!("failed to parse signing credentials: {e}"))
        })?;
        if raw.secret_id.is_empty() || raw.secret_key.is_empty() {
            return Err(AdapterError::SigningError(
                "signing credentials require secret_id and secret_key".into(),
            ));
        }
        Ok(Self::new(raw.secret_id, raw.secret_key))
    }
}

/// Everything the signature depends on. Built per request.
#[derive(Debug, Clone)]
pub struct SigningContext<'a> {
    pub credentials: &'a Tc3Credentials,
    pub method: &'a str,
    pub url: &'a str,
    pub body: &'a [u8],
    pub headers: &'a HeaderMap,
    pub params: &'a TencentCommonParams,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Step 1 output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    pub text: String,
    pub signed_headers: String,
    pub host: String,
    pub service: String,
}

/// Steps 2-3 output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToSign {
    pub text: String,
    pub date: String,
    pub credential_scope: String,
}

/// Step 5 output: lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tc3Signature(pub String);

/// The complete header set produced by [`sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub timestamp: String,
    pub version: String,
    pub region: String,
    pub action: String,
}

impl SignedHeaders {
    pub fn pairs(&self) -> [(HeaderName, &str); 5] {
        [
            (AUTHORIZATION, self.authorization.as_str()),
            (HeaderName::from_static("x-tc-timestamp"), self.timestamp.as_str()),
            (HeaderName::from_static("x-tc-version"), self.version.as_str()),
            (HeaderName::from_static("x-tc-region"), self.region.as_str()),
            (HeaderName::from_static("x-tc-action"), self.action.as_str()),
        ]
    }

    /// Insert all headers, or none if any value is not a valid header value.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AdapterError> {
        let mut staged = Vec::with_capacity(5);
        for (name, value) in self.pairs() {
            let value = HeaderValue::from_str(value).map_err(|e| {
                AdapterError::SigningError(format!("invalid {name} header value: {e}"))
            })?;
            staged.push((name, value));
        }
        for (name, value) in staged {
            headers.insert(name, value);
        }
        Ok(())
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], msg: &str) -> Result<Vec<u8>, AdapterError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AdapterError::SigningError(format!("invalid HMAC key: {e}")))?;
    mac.update(msg.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn parse_host(url: &str) -> Result<(String, String), AdapterError> {
    let parsed = Url::parse(url)
        .map_err(|e| AdapterError::SigningError(format!("invalid request url {url:?}: {e}")))?;
    let hostname = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AdapterError::SigningError(format!("request url {url:?} has no host")))?;
    let host = match parsed.port() {
        Some(port) => format!("{hostname}:{port}"),
        None => hostname.to_string(),
    };
    let service = hostname.split('.').next().unwrap_or(hostname).to_string();
    Ok((host, service))
}

impl SigningContext<'_> {
    pub fn canonical_request(&self) -> Result<CanonicalRequest, AdapterError> {
        let (host, service) = parse_host(self.url)?;

        let mut canonical_headers = String::new();
        let mut signed = Vec::with_capacity(SIGNED_HEADERS.len() + 1);
        for name in SIGNED_HEADERS {
            if let Some(value) = self.headers.get(*name) {
                let value = value.to_str().map_err(|e| {
                    AdapterError::SigningError(format!("non-ascii {name} header: {e}"))
                })?;
                canonical_headers.push_str(&format!("{name}:{}\n", value.to_lowercase()));
                signed.push(*name);
            }
        }
        canonical_headers.push_str(&format!("host:{host}\n"));
        signed.push("host");
        let signed_headers = signed.join(";");

        let text = format!(
            "{}\n/\n\n{}\n{}\n{}",
            self.method,
            canonical_headers,
            signed_headers,
            sha256_hex(self.body)
        );
        Ok(CanonicalRequest {
            text,
            signed_headers,
            host,
            service,
        })
    }

    pub fn string_to_sign(&self, canonical: &CanonicalRequest) -> Result<StringToSign, AdapterError> {
        let date = chrono::DateTime::from_timestamp(self.timestamp, 0)
            .ok_or_else(|| {
                AdapterError::SigningError(format!("timestamp {} out of range", self.timestamp))
            })?
            .format("%Y-%m-%d")
            .to_string();
        let credential_scope = format!("{date}/{}/{TERMINATOR}", canonical.service);
        let text = format!(
            "{ALGORITHM}\n{}\n{credential_scope}\n{}",
            self.timestamp,
            sha256_hex(canonical.text.as_bytes())
        );
        Ok(StringToSign {
            text,
            date,
            credential_scope,
        })
    }

    pub fn signature(
        &self,
        canonical: &CanonicalRequest,
        to_sign: &StringToSign,
    ) -> Result<Tc3Signature, AdapterError> {
        let secret = format!("TC3{}", self.credentials.secret_key.expose_secret());
        let secret_date = hmac_sha256(secret.as_bytes(), &to_sign.date)?;
        let secret_service = hmac_sha256(&secret_date, &canonical.service)?;
        let secret_signing = hmac_sha256(&secret_service, TERMINATOR)?;
        let raw = hmac_sha256(&secret_signing, &to_sign.text)?;
        Ok(Tc3Signature(hex::encode(raw)))
    }
}

/// Compute the authenticated header set for `ctx`.
///
/// Either every header is produced or an error is returned.
pub fn sign(ctx: &SigningContext<'_>) -> Result<SignedHeaders, AdapterError> {
    let canonical = ctx.canonical_request()?;
    let to_sign = ctx.string_to_sign(&canonical)?;
    let signature = ctx.signature(&canonical, &to_sign)?;

    let authorization = format!(
        "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
        ctx.credentials.secret_id, to_sign.credential_scope, canonical.signed_headers, signature.0
    );
    Ok(SignedHeaders {
        authorization,
        timestamp: ctx.timestamp.to_string(),
        version: ctx.params.version.clone(),
        region: ctx.params.region.clone(),
        action: ctx.params.action.clone(),
    })
}
