//! Streaming Module
//!
//! Turns a transport's raw stream into the [`StreamChunk`](crate::types::StreamChunk)
//! protocol consumed by the orchestrator.

pub mod bridge;

pub use bridge::StreamBridge;
