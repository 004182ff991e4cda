//! HTTP Execution
//!
//! - the transport client contract (`transport`)
//! - request authentication per service auth type (`auth`)
//! - the reqwest-backed transport (`client`)
//! - stream framing for JSON-lines and SSE bodies (`framing`)
//! - non-success response classification (`errors`)
//! - header helpers (`headers`)

pub mod auth;
pub mod client;
pub mod errors;
pub mod framing;
pub mod headers;
pub mod transport;

pub use auth::{BearerApiKey, NoAuth, RequestAuthenticator, Tc3Authenticator};
pub use client::HttpTransport;
pub use transport::{RawStream, RawStreamSender, RequestBody, TransportCall, TransportClient};
