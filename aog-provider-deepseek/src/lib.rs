//! aog-provider-deepseek
//!
//! Adapter for the DeepSeek chat API. `chat` is offered in unary and
//! streaming (SSE) modes; requests are forwarded verbatim and responses are
//! returned unchanged. Calls authenticate with a bearer token taken from the
//! `api_key` field of the call's auth info.

pub mod adapter;
pub mod config;

pub use adapter::DeepSeekAdapter;
pub use config::DeepSeekConfig;

pub const BACKEND_ID: &str = "deepseek";
