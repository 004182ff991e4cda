//! Default values shared across adapters.

use std::time::Duration;

pub mod http {
    use super::*;

    /// Connection establishment timeout. Whole-call timeouts are expressed
    /// by the caller through cancellation instead.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub const USER_AGENT: &str = concat!("aog-adapter/", env!("CARGO_PKG_VERSION"));
}

pub mod streaming {
    /// Buffered fragments between a transport task and the bridge.
    pub const DATA_CHANNEL_CAPACITY: usize = 10;
    /// A transport reports at most one terminal error.
    pub const ERROR_CHANNEL_CAPACITY: usize = 1;
    /// Buffered chunks between the bridge and the orchestrator-side reader.
    pub const OUTPUT_CHANNEL_CAPACITY: usize = 10;

    pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";
    pub const SSE_DONE_MARKER: &str = "[DONE]";
}

/// Cause reported when a handle is cancelled without an explicit reason.
pub const DEFAULT_CANCEL_CAUSE: &str = "context canceled";
