//! Core error types.

use thiserror::Error;

/// Coarse classification of an [`AdapterError`].
///
/// The orchestrator owns retry policy; this only tells it what kind of
/// failure it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed inbound payload or backend payload that could not be decoded.
    Decode,
    /// Backend unreachable, non-success response, or broken stream.
    Transport,
    /// Malformed credentials or endpoint URL, raised before any network call.
    Signing,
    /// The caller cancelled the call (including caller-side timeouts).
    Cancellation,
    /// Requested service or mode is not offered by the backend.
    Unsupported,
    /// Adapter misconfiguration (unknown service endpoint, bad scheme, ...).
    Configuration,
}

/// Adapter error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// Inbound request could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Connection-level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Backend answered with a non-success status.
    #[error("API returned status {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Request signing failed (credentials or endpoint).
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Credential payload missing or unusable for the configured auth type.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Backend stream broke mid-flight.
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("unsupported service: {0}")]
    UnsupportedService(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Call cancelled by the orchestrator; carries the cancellation cause.
    #[error("{0}")]
    Cancelled(String),

    /// A failure annotated with the backend and service it came from.
    #[error("{backend} {service} failed: {source}")]
    Backend {
        backend: String,
        service: String,
        source: Box<AdapterError>,
    },
}

impl AdapterError {
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach backend/service context.
    ///
    /// Cancellation passes through untouched so the terminal chunk carries
    /// the exact cause, and already-annotated errors are not wrapped twice.
    pub fn in_service(self, backend: impl Into<String>, service: impl Into<String>) -> Self {
        match self {
            Self::Cancelled(_) | Self::Backend { .. } => self,
            other => Self::Backend {
                backend: backend.into(),
                service: service.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping `Backend` annotations.
    pub fn root(&self) -> &AdapterError {
        match self {
            Self::Backend { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            Self::DecodeError(_) | Self::JsonError(_) => ErrorCategory::Decode,
            Self::HttpError(_) | Self::ApiError { .. } | Self::StreamError(_) => {
                ErrorCategory::Transport
            }
            Self::SigningError(_) | Self::AuthenticationError(_) => ErrorCategory::Signing,
            Self::Cancelled(_) => ErrorCategory::Cancellation,
            Self::UnsupportedService(_) | Self::UnsupportedOperation(_) => {
                ErrorCategory::Unsupported
            }
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::Backend { .. } => unreachable!("root() never returns Backend"),
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self.root(), Self::Cancelled(_))
    }

    /// HTTP status reported by the backend, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}
