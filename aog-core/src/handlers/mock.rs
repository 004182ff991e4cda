//! In-memory transport for handler and dispatch tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::error::AdapterError;
use crate::execution::http::transport::{RawStream, RequestBody, TransportCall, TransportClient};

#[derive(Default)]
pub(crate) struct MockTransport {
    pub response: Mutex<Option<Result<Value, AdapterError>>>,
    pub fragments: Vec<&'static str>,
    pub stream_error: Option<AdapterError>,
    pub calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn replying(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(Ok(response))),
            ..Default::default()
        })
    }

    pub fn failing(error: AdapterError) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(Err(error))),
            ..Default::default()
        })
    }

    pub fn streaming(fragments: Vec<&'static str>, stream_error: Option<AdapterError>) -> Arc<Self> {
        Arc::new(Self {
            fragments,
            stream_error,
            ..Default::default()
        })
    }

    fn record(&self, call: &TransportCall) {
        let body = match &call.body {
            RequestBody::Json(v) => v.clone(),
            _ => Value::Null,
        };
        self.calls.lock().unwrap().push((call.service.clone(), body));
    }

    pub fn last_body(&self) -> Value {
        self.calls.lock().unwrap().last().unwrap().1.clone()
    }
}

#[async_trait]
impl TransportClient for MockTransport {
    async fn execute(&self, call: TransportCall) -> Result<Value, AdapterError> {
        self.record(&call);
        let response = self.response.lock().unwrap().take();
        call.cancel
            .run(async move { response.unwrap_or_else(|| Ok(Value::Null)) })
            .await
    }

    fn stream(&self, call: TransportCall) -> RawStream {
        self.record(&call);
        let (tx, raw) = RawStream::channel();
        let fragments = self.fragments.clone();
        let error = self.stream_error.clone();
        tokio::spawn(async move {
            for f in fragments {
                if !tx.send(Bytes::from_static(f.as_bytes())).await {
                    return;
                }
            }
            if let Some(e) = error {
                tx.fail(e);
            }
        });
        raw
    }
}
