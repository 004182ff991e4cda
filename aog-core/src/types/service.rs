//! Inbound and unary wire shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Document;
use crate::error::AdapterError;

/// Capability requested by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Chat,
    Generate,
    Embed,
    TextToImage,
    ImageToImage,
    TextToSpeech,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        Self::Chat,
        Self::Generate,
        Self::Embed,
        Self::TextToImage,
        Self::ImageToImage,
        Self::TextToSpeech,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Generate => "generate",
            Self::Embed => "embed",
            Self::TextToImage => "text-to-image",
            Self::ImageToImage => "image-to-image",
            Self::TextToSpeech => "text-to-speech",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AdapterError::UnsupportedService(s.to_string()))
    }
}

/// Normalized request as sent by the orchestrator: `{service, data}`.
///
/// `service` stays a plain string so an unknown capability surfaces as
/// `UnsupportedService` rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub service: String,
    #[serde(default)]
    pub data: Document,
}

impl ServiceRequest {
    pub fn new(service: ServiceKind, data: Document) -> Self {
        Self {
            service: service.as_str().to_string(),
            data,
        }
    }

    /// Decode the inbound byte payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, AdapterError> {
        serde_json::from_slice(bytes)
            .map_err(|e| AdapterError::DecodeError(format!("failed to unmarshal request: {e}")))
    }

    pub fn kind(&self) -> Result<ServiceKind, AdapterError> {
        self.service.parse()
    }

    pub fn encode(&self) -> Result<Vec<u8>, AdapterError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Normalized unary response: `{data, error?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(default)]
    pub data: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResponse {
    pub fn from_data(data: Document) -> Self {
        Self { data, error: None }
    }

    pub fn encode(&self) -> Result<Vec<u8>, AdapterError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AdapterError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
