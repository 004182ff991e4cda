//! Request field mapping.

use serde_json::Value;

use crate::types::Document;
use crate::types::document::rename_if_present;

/// One field rule. Absent source fields are skipped, never defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    Forward(&'static str),
    Rename {
        from: &'static str,
        to: &'static str,
    },
}

/// Ordered rules turning normalized `data` into a backend request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    rules: Vec<FieldRule>,
    stream_flag: bool,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forward(mut self, field: &'static str) -> Self {
        self.rules.push(FieldRule::Forward(field));
        self
    }

    pub fn rename(mut self, from: &'static str, to: &'static str) -> Self {
        self.rules.push(FieldRule::Rename { from, to });
        self
    }

    /// Always emit `"stream": <bool>` matching the call mode.
    pub fn with_stream_flag(mut self) -> Self {
        self.stream_flag = true;
        self
    }

    pub fn apply(&self, data: &Document, streaming: bool) -> Document {
        let mut out = Document::new();
        if self.stream_flag {
            out.insert("stream".to_string(), Value::Bool(streaming));
        }
        for rule in &self.rules {
            let (from, to) = match rule {
                FieldRule::Forward(field) => (*field, *field),
                FieldRule::Rename { from, to } => (*from, *to),
            };
            rename_if_present(data, &mut out, from, to);
        }
        out
    }
}
