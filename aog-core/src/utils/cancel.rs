//! Cancellation utilities
//!
//! Provides the cooperative cancellation handle that flows from the
//! orchestrator's call context down to the transport and the streaming bridge.

use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;

use crate::error::AdapterError;

/// Cooperative cancellation signal with a recorded cause.
///
/// Clones observe the same signal. The first recorded cause wins; later
/// `cancel_with` calls only re-trigger the (already triggered) token.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    cause: Arc<OnceLock<String>>,
}

impl CancelHandle {
    /// An untriggered handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation with the default cause.
    pub fn cancel(&self) {
        self.cancel_with(crate::defaults::DEFAULT_CANCEL_CAUSE);
    }

    /// Request cancellation and record why (e.g. "deadline exceeded").
    pub fn cancel_with(&self, cause: impl Into<String>) {
        let _ = self.cause.set(cause.into());
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the handle is triggered.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// The cancellation cause as an error value.
    pub fn cause(&self) -> AdapterError {
        let cause = self
            .cause
            .get()
            .cloned()
            .unwrap_or_else(|| crate::defaults::DEFAULT_CANCEL_CAUSE.to_string());
        AdapterError::Cancelled(cause)
    }

    /// Run `fut` unless cancellation fires first; cancellation wins ties.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, AdapterError>
    where
        F: std::future::Future<Output = Result<T, AdapterError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(self.cause()),
            res = fut => res,
        }
    }
}
