//! Ollama service handlers.

use std::sync::Arc;

use aog_core::handlers::{FieldMapping, MappedService};
use aog_core::prelude::*;

use crate::BACKEND_ID;

/// `/api/chat` body.
pub fn chat_mapping() -> FieldMapping {
    FieldMapping::new()
        .with_stream_flag()
        .forward("model")
        .forward("messages")
        .forward("temperature")
        .forward("top_p")
        .rename("max_tokens", "num_predict")
}

/// `/api/generate` body.
pub fn generate_mapping() -> FieldMapping {
    FieldMapping::new()
        .with_stream_flag()
        .forward("model")
        .forward("prompt")
        .forward("temperature")
        .forward("top_p")
}

/// `/api/embeddings` body.
pub fn embed_mapping() -> FieldMapping {
    FieldMapping::new().forward("model").rename("input", "prompt")
}

pub fn service_table(transport: Arc<dyn TransportClient>) -> ServiceTable {
    let mapped = |kind, mapping| MappedService::new(BACKEND_ID, kind, transport.clone(), mapping);
    ServiceTable::new(BACKEND_ID)
        .register(
            ServiceKind::Chat,
            ServiceHandlers::both(mapped(ServiceKind::Chat, chat_mapping())),
        )
        .register(
            ServiceKind::Generate,
            ServiceHandlers::both(mapped(ServiceKind::Generate, generate_mapping())),
        )
        .register(
            ServiceKind::Embed,
            ServiceHandlers::unary(mapped(ServiceKind::Embed, embed_mapping())),
        )
}
