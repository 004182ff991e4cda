//! Response normalization policies.

use serde_json::Value;

use crate::error::AdapterError;
use crate::types::document::{forward_if_present, get_u64, into_document};
use crate::types::{Document, Usage};

/// Counter fields a backend reports token usage in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageFields {
    pub prompt: &'static str,
    pub completion: &'static str,
}

/// Fixed subset of a backend response copied into the normalized response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSpec {
    pub fields: Vec<&'static str>,
    pub usage: Option<UsageFields>,
}

impl ExtractSpec {
    pub fn new(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, prompt: &'static str, completion: &'static str) -> Self {
        self.usage = Some(UsageFields { prompt, completion });
        self
    }
}

/// What a handler does with the backend's response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Return the payload unchanged; the orchestrator normalizes it.
    #[default]
    Passthrough,
    Extract(ExtractSpec),
}

impl ResponsePolicy {
    pub fn apply(&self, response: Value) -> Result<Document, AdapterError> {
        let doc = into_document(response).ok_or_else(|| {
            AdapterError::DecodeError("backend response is not a JSON object".into())
        })?;
        match self {
            Self::Passthrough => Ok(doc),
            Self::Extract(spec) => {
                let mut out = Document::new();
                for field in &spec.fields {
                    forward_if_present(&doc, &mut out, field);
                }
                if let Some(fields) = spec.usage
                    && let Some(usage) = Usage::from_counters(
                        get_u64(&doc, fields.prompt),
                        get_u64(&doc, fields.completion),
                    )
                {
                    out.insert("usage".to_string(), serde_json::to_value(usage)?);
                }
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_policy() -> ResponsePolicy {
        ResponsePolicy::Extract(
            ExtractSpec::new(["message", "model"]).with_usage("prompt_eval_count", "eval_count"),
        )
    }

    #[test]
    fn extract_copies_fields_and_sums_usage() {
        let out = chat_policy()
            .apply(json!({
                "model": "hunyuan-lite",
                "message": { "role": "assistant", "content": "hi" },
                "prompt_eval_count": 26,
                "eval_count": 10,
                "created_at": "2024-01-01"
            }))
            .unwrap();
        assert_eq!(
            Value::Object(out),
            json!({
                "model": "hunyuan-lite",
                "message": { "role": "assistant", "content": "hi" },
                "usage": { "prompt_tokens": 26, "completion_tokens": 10, "total_tokens": 36 }
            })
        );
    }

    #[test]
    fn usage_is_omitted_when_a_counter_is_missing() {
        let out = chat_policy()
            .apply(json!({ "model": "m", "prompt_eval_count": 26 }))
            .unwrap();
        assert!(!out.contains_key("usage"));
        assert_eq!(out.get("model"), Some(&json!("m")));
    }

    #[test]
    fn passthrough_returns_payload_unchanged() {
        let payload = json!({ "embedding": [0.1, 0.2], "anything": { "nested": true } });
        let out = ResponsePolicy::Passthrough.apply(payload.clone()).unwrap();
        assert_eq!(Value::Object(out), payload);
    }

    #[test]
    fn non_object_response_is_decode_error() {
        assert!(matches!(
            ResponsePolicy::Passthrough.apply(json!([1, 2])),
            Err(AdapterError::DecodeError(_))
        ));
    }
}
