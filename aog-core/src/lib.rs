//! aog-core
//!
//! Backend-agnostic runtime shared by every AOG service adapter:
//! - the dispatch contract an orchestrator uses across backends (`dispatch`)
//! - per-capability service handlers and field normalization (`handlers`)
//! - the streaming bridge that turns raw backend streams into `StreamChunk`s (`streaming`)
//! - the transport client contract and its reqwest implementation (`execution`)
//! - TC3-HMAC-SHA256 request signing (`signing`)
#![deny(unsafe_code)]

pub mod config;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod observability;
pub mod signing;
pub mod streaming;
pub mod types;
pub mod utils;

pub use error::AdapterError;

/// Commonly used items for provider crates.
pub mod prelude {
    pub use crate::config::{AuthType, HttpConfig, ServiceConfig, StreamFormat, TransportConfig};
    pub use crate::dispatch::{BackendAdapter, DispatchCapability, ServiceHandlers, ServiceTable};
    pub use crate::error::AdapterError;
    pub use crate::execution::http::transport::{RawStream, RequestBody, TransportCall, TransportClient};
    pub use crate::handlers::{StreamingHandler, UnaryHandler};
    pub use crate::streaming::StreamBridge;
    pub use crate::types::{
        Document, InvocationContext, ServiceKind, ServiceRequest, ServiceResponse, StreamChunk,
        Usage,
    };
    pub use crate::utils::cancel::CancelHandle;
}
