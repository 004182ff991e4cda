use secrecy::SecretString;

use crate::utils::cancel::CancelHandle;

/// Per-call context handed down from the orchestrator.
///
/// `auth_info` is the opaque credential payload (usually JSON) the
/// orchestrator attaches to the call; each authenticator interprets it.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
    pub auth_info: Option<SecretString>,
    pub cancel: CancelHandle,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            auth_info: None,
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_auth_info(mut self, auth_info: impl Into<String>) -> Self {
        let auth_info: String = auth_info.into();
        self.auth_info = (!auth_info.is_empty()).then(|| SecretString::from(auth_info));
        self
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}
