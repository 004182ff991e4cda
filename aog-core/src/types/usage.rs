use serde::{Deserialize, Serialize};

/// Token accounting extracted from a backend response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    /// Build usage from backend-reported counters.
    ///
    /// Returns `None` unless both counters are present; partial usage is
    /// never reported.
    pub fn from_counters(prompt: Option<u64>, completion: Option<u64>) -> Option<Self> {
        let (prompt_tokens, completion_tokens) = (prompt?, completion?);
        Some(Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        })
    }
}
