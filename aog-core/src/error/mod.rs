//! Error Handling Module
//!
//! One error type for every failure that can cross the adapter boundary:
//! - Core error type (`AdapterError`) and its coarse `ErrorCategory`
//! - Conversions from the crates the adapters talk to (`serde_json`, `reqwest`)
//!
//! # Example
//!
//! ```rust,ignore
//! use aog_core::error::{AdapterError, ErrorCategory};
//!
//! let err = AdapterError::api_error(404, "model not found");
//! assert_eq!(err.category(), ErrorCategory::Transport);
//! ```

mod conversions;
pub mod types;

pub use types::*;
