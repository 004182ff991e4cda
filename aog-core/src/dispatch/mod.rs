//! Dispatch Contract
//!
//! The capability interface an orchestrator uses across backends. Each
//! backend declares, per service, whether it answers unary calls, streaming
//! calls or both; the orchestrator picks from the declaration and never
//! probes.

pub mod adapter;
pub mod table;

pub use adapter::BackendAdapter;
pub use table::{DispatchCapability, ServiceHandlers, ServiceTable};
