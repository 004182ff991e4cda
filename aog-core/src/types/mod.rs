//! Types Module
//!
//! The normalized data model exchanged between the orchestrator and an adapter.

mod chunk;
mod context;
pub mod document;
mod service;
mod usage;

pub use chunk::*;
pub use context::*;
pub use document::Document;
pub use service::*;
pub use usage::*;
