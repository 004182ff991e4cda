//! aog-provider-ollama
//!
//! Adapter for a local Ollama engine. Offers `chat` and `generate` (unary and
//! streaming) and `embed` (unary). Streaming responses are newline-delimited
//! JSON; no authentication is applied.
//!
//! Requests are rebuilt from the recognized fields only:
//! - `max_tokens` is sent as `num_predict`
//! - embed `input` is sent as `prompt`
//! - `stream` always reflects the call mode

pub mod adapter;
pub mod config;
pub mod services;

pub use adapter::OllamaAdapter;
pub use config::OllamaConfig;

/// Backend identifier used in logs and error messages.
pub const BACKEND_ID: &str = "ollama";
