//! aog-provider-tencent
//!
//! Adapter for Tencent Cloud's Hunyuan APIs: `chat` (unary and SSE
//! streaming) and `text-to-image` (unary). Every request is signed with
//! TC3-HMAC-SHA256 using the `secret_id`/`secret_key` pair in the call's
//! auth info; API version, action and region come from each service's
//! `extra_headers`.
//!
//! Unary chat responses are reduced to `message`, `model` and a `usage`
//! block computed from `prompt_eval_count`/`eval_count`.

pub mod adapter;
pub mod config;

pub use adapter::TencentAdapter;
pub use config::TencentConfig;

pub const BACKEND_ID: &str = "tencent";
