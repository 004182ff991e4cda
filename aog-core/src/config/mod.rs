//! Configuration Module
//!
//! Typed configuration handed to an adapter by its host process. Nothing in
//! this module reads files; loading a plugin manifest is the host's job.

pub mod http;
pub mod service;

pub use http::{HttpConfig, HttpConfigBuilder};
pub use service::{AuthType, ServiceConfig, StreamFormat, TencentCommonParams, TransportConfig};
