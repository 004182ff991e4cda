//! Observability
//!
//! Adapters log through `tracing` with `request_id`, `backend` and `service`
//! fields. The hosting process normally installs the subscriber; the
//! `telemetry` feature offers a ready-made one for standalone use.

#[cfg(feature = "telemetry")]
pub mod telemetry;
