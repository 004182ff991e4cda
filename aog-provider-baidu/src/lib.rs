//! aog-provider-baidu
//!
//! Adapter for Baidu Qianfan. `chat` supports unary and SSE streaming;
//! `embed`, `text-to-speech` and `image-to-image` are unary. All services
//! forward `data` verbatim, return the backend payload unchanged and
//! authenticate with a bearer `api_key`.

pub mod adapter;
pub mod config;

pub use adapter::BaiduAdapter;
pub use config::BaiduConfig;

pub const BACKEND_ID: &str = "baidu";
