//! Execution Layer
//!
//! Everything that talks to a backend over the network.

pub mod http;
