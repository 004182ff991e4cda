//! reqwest-backed transport client.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::auth::{AuthRequest, RequestAuthenticator, authenticator_for};
use super::errors::classify_response;
use super::framing;
use super::headers::insert_lenient;
use super::transport::{RawStream, RawStreamSender, TransportCall, TransportClient};
use crate::config::{AuthType, StreamFormat, TransportConfig};
use crate::defaults::streaming::EVENT_STREAM_CONTENT_TYPE;
use crate::error::AdapterError;

/// A request with URL, headers and body fully resolved and authenticated.
#[derive(Debug)]
struct PreparedRequest {
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

/// HTTP transport for one backend.
#[derive(Clone)]
pub struct HttpTransport {
    config: Arc<TransportConfig>,
    client: reqwest::Client,
    authenticators: HashMap<AuthType, Arc<dyn RequestAuthenticator>>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url)
            .field("stream_format", &self.config.stream_format)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, AdapterError> {
        let client = config.http.build_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Use a caller-provided reqwest client.
    pub fn with_client(config: TransportConfig, client: reqwest::Client) -> Self {
        let authenticators = [AuthType::None, AuthType::ApiKey, AuthType::Sign]
            .into_iter()
            .map(|t| (t, authenticator_for(t)))
            .collect();
        Self {
            config: Arc::new(config),
            client,
            authenticators,
        }
    }

    /// Replace the authenticator used for `auth_type`.
    pub fn with_authenticator(
        mut self,
        auth_type: AuthType,
        authenticator: Arc<dyn RequestAuthenticator>,
    ) -> Self {
        self.authenticators.insert(auth_type, authenticator);
        self
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn prepare(&self, call: &TransportCall, streaming: bool) -> Result<PreparedRequest, AdapterError> {
        let service = self.config.service(&call.service)?;
        let url = self.config.resolve_url(service);
        let body = call.body.to_bytes()?;

        let mut headers = HeaderMap::new();
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        let accept = match (streaming, self.config.stream_format) {
            (true, StreamFormat::Sse) => EVENT_STREAM_CONTENT_TYPE,
            _ => "application/json",
        };
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        if streaming && self.config.http.stream_disable_compression {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        }

        // Signed services carry signing parameters in `extra_headers`, not headers.
        if service.auth_type != AuthType::Sign {
            match service.extra_header_pairs() {
                Ok(pairs) => insert_lenient(&mut headers, &pairs),
                Err(e) => error!(
                    request_id = %call.request_id,
                    service = %call.service,
                    error = %e,
                    "Failed to set headers"
                ),
            }
        }

        let authenticator = self
            .authenticators
            .get(&service.auth_type)
            .cloned()
            .unwrap_or_else(|| authenticator_for(service.auth_type));
        authenticator.authenticate(
            AuthRequest {
                method: call.method.as_str(),
                url: &url,
                body: body.as_deref().unwrap_or_default(),
                service,
                auth_info: call.auth_info.as_ref(),
            },
            &mut headers,
        )?;

        Ok(PreparedRequest { url, headers, body })
    }

    fn request_builder(
        client: &reqwest::Client,
        call: &TransportCall,
        prepared: PreparedRequest,
    ) -> reqwest::RequestBuilder {
        let builder = client
            .request(call.method.clone(), &prepared.url)
            .headers(prepared.headers);
        match prepared.body {
            Some(body) => builder.body(body),
            None => builder,
        }
    }

    async fn send_unary(&self, call: &TransportCall, prepared: PreparedRequest) -> Result<Value, AdapterError> {
        let response = Self::request_builder(&self.client, call, prepared)
            .send()
            .await
            .map_err(|e| AdapterError::HttpError(format!("request failed: {e}")))?;

        let status = response.status();
        debug!(request_id = %call.request_id, status = status.as_u16(), "HTTP response");
        if !status.is_success() {
            return Err(classify_response(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdapterError::HttpError(format!("failed to read response: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| AdapterError::DecodeError(format!("failed to decode response: {e}")))
    }

    async fn pump(
        client: reqwest::Client,
        call: TransportCall,
        prepared: PreparedRequest,
        format: StreamFormat,
        sink: RawStreamSender,
    ) {
        let response = match Self::request_builder(&client, &call, prepared).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(request_id = %call.request_id, error = %e, "Streaming request failed");
                sink.fail(AdapterError::HttpError(format!("request failed: {e}")));
                return;
            }
        };

        debug!(
            request_id = %call.request_id,
            status = response.status().as_u16(),
            "Streaming response status"
        );
        if !response.status().is_success() {
            sink.fail(classify_response(response).await);
            return;
        }

        let bytes = response.bytes_stream();
        match format {
            StreamFormat::JsonLines => framing::forward_json_lines(bytes, &sink).await,
            StreamFormat::Sse => framing::forward_sse(bytes, &sink).await,
        }
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn execute(&self, call: TransportCall) -> Result<Value, AdapterError> {
        let prepared = self.prepare(&call, false)?;
        debug!(
            request_id = %call.request_id,
            method = %call.method,
            url = %prepared.url,
            "HTTP request"
        );
        call.cancel.run(self.send_unary(&call, prepared)).await
    }

    fn stream(&self, call: TransportCall) -> RawStream {
        let prepared = match self.prepare(&call, true) {
            Ok(prepared) => prepared,
            Err(e) => return RawStream::failed(e),
        };
        debug!(
            request_id = %call.request_id,
            method = %call.method,
            url = %prepared.url,
            "HTTP streaming request"
        );

        let (sink, raw) = RawStream::channel();
        let client = self.client.clone();
        let format = self.config.stream_format;
        tokio::spawn(async move {
            let cancel = call.cancel.clone();
            let request_id = call.request_id.clone();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(request_id = %request_id, "streaming request cancelled");
                }
                _ = Self::pump(client, call, prepared, format, sink) => {
                    debug!(request_id = %request_id, "HTTP streaming completed");
                }
            }
        });
        raw
    }
}
