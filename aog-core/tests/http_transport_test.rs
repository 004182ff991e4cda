use std::sync::Arc;
use std::time::Duration;

use aog_core::execution::http::{HttpTransport, Tc3Authenticator};
use aog_core::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = r#"{"secret_id":"AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE","secret_key":"Gu5t9xGARNpq86cd98joQYCN3EXAMPLE"}"#;

fn transport(server: &MockServer, service: ServiceConfig, format: StreamFormat) -> HttpTransport {
    let config = TransportConfig::new(server.uri())
        .with_service(service)
        .with_stream_format(format);
    HttpTransport::new(config).unwrap()
}

async fn drain(mut raw: RawStream) -> (Vec<String>, Option<AdapterError>) {
    let mut fragments = Vec::new();
    while let Some(bytes) = raw.data.recv().await {
        fragments.push(String::from_utf8(bytes.to_vec()).unwrap());
    }
    (fragments, raw.errors.recv().await)
}

#[tokio::test]
async fn unary_posts_json_and_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "model": "nomic", "prompt": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": [0.5, 1.0] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = transport(
        &server,
        ServiceConfig::new("embed", "/api/embeddings"),
        StreamFormat::JsonLines,
    );
    let ctx = InvocationContext::new();
    let value = client
        .execute(TransportCall::post(
            &ctx,
            "embed",
            RequestBody::Json(json!({ "model": "nomic", "prompt": "hi" })),
        ))
        .await
        .unwrap();
    assert_eq!(value, json!({ "embedding": [0.5, 1.0] }));
}

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": { "message": "bad key" } })),
        )
        .mount(&server)
        .await;

    let client = transport(&server, ServiceConfig::new("chat", "/chat"), StreamFormat::Sse);
    let err = client
        .execute(TransportCall::post(
            &InvocationContext::new(),
            "chat",
            RequestBody::Json(json!({})),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert!(err.to_string().contains("bad key"));
}

#[tokio::test]
async fn unknown_service_fails_before_sending() {
    let server = MockServer::start().await;
    let client = transport(&server, ServiceConfig::new("chat", "/chat"), StreamFormat::Sse);
    let err = client
        .execute(TransportCall::post(
            &InvocationContext::new(),
            "rerank",
            RequestBody::Empty,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::ConfigurationError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn bearer_token_and_extra_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/chat"))
        .and(header("authorization", "Bearer sk-123"))
        .and(header("x-appbuilder-from", "aog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "r1" })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ServiceConfig::new("chat", "/v2/chat")
        .with_auth_type(AuthType::ApiKey)
        .with_extra_headers(r#"{"X-Appbuilder-From":"aog"}"#);
    let client = transport(&server, service, StreamFormat::Sse);
    let ctx = InvocationContext::new().with_auth_info(r#"{"api_key":"sk-123"}"#);
    let value = client
        .execute(TransportCall::post(&ctx, "chat", RequestBody::Json(json!({}))))
        .await
        .unwrap();
    assert_eq!(value["id"], "r1");
}

#[tokio::test]
async fn malformed_extra_headers_are_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ServiceConfig::new("chat", "/chat").with_extra_headers("{not json");
    let client = transport(&server, service, StreamFormat::Sse);
    assert!(
        client
            .execute(TransportCall::post(
                &InvocationContext::new(),
                "chat",
                RequestBody::Json(json!({})),
            ))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn tc3_signed_request_carries_tencent_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-tc-action", "ChatCompletions"))
        .and(header("x-tc-version", "2023-09-01"))
        .and(header("x-tc-region", "ap-guangzhou"))
        .and(header("x-tc-timestamp", "1700000000"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Response": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ServiceConfig::new("chat", "/")
        .with_auth_type(AuthType::Sign)
        .with_extra_headers(
            r#"{"version":"2023-09-01","action":"ChatCompletions","region":"ap-guangzhou"}"#,
        );
    let client = transport(&server, service, StreamFormat::Sse)
        .with_authenticator(AuthType::Sign, Arc::new(Tc3Authenticator::with_clock(|| 1_700_000_000)));
    let ctx = InvocationContext::new().with_auth_info(SECRET);
    client
        .execute(TransportCall::post(&ctx, "chat", RequestBody::Json(json!({}))))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with(
        "TC3-HMAC-SHA256 Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/2023-11-14/127/tc3_request"
    ));
    assert!(auth.contains("SignedHeaders=content-type;host"));
    for param in ["version", "action", "region"] {
        assert!(
            requests[0].headers.get(param).is_none(),
            "signing parameter {param} leaked as a header"
        );
    }
}

#[tokio::test]
async fn tc3_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    let service = ServiceConfig::new("chat", "/").with_auth_type(AuthType::Sign);
    let client = transport(&server, service, StreamFormat::Sse);
    let err = client
        .execute(TransportCall::post(
            &InvocationContext::new(),
            "chat",
            RequestBody::Json(json!({})),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::SigningError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_lines_stream_forwards_each_document() {
    let server = MockServer::start().await;
    let body = "{\"done\":false,\"response\":\"Hel\"}\n{\"done\":false,\"response\":\"lo\"}\n{\"done\":true}\n";
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&server)
        .await;

    let client = transport(
        &server,
        ServiceConfig::new("generate", "/api/generate"),
        StreamFormat::JsonLines,
    );
    let raw = client.stream(TransportCall::post(
        &InvocationContext::new(),
        "generate",
        RequestBody::Json(json!({ "stream": true })),
    ));
    let (fragments, error) = drain(raw).await;
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[2], r#"{"done":true}"#);
    assert!(error.is_none());
}

#[tokio::test]
async fn sse_stream_requests_event_stream_and_stops_at_done() {
    let server = MockServer::start().await;
    let body = "data: {\"id\":\"a\"}\n\ndata: {\"id\":\"b\"}\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = transport(
        &server,
        ServiceConfig::new("chat", "/chat/completions"),
        StreamFormat::Sse,
    );
    let raw = client.stream(TransportCall::post(
        &InvocationContext::new(),
        "chat",
        RequestBody::Json(json!({ "stream": true })),
    ));
    let (fragments, error) = drain(raw).await;
    assert_eq!(fragments, vec![r#"{"id":"a"}"#, r#"{"id":"b"}"#]);
    assert!(error.is_none());
}

#[tokio::test]
async fn stream_reports_http_failure_on_error_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = transport(&server, ServiceConfig::new("chat", "/chat"), StreamFormat::Sse);
    let raw = client.stream(TransportCall::post(
        &InvocationContext::new(),
        "chat",
        RequestBody::Json(json!({})),
    ));
    let (fragments, error) = drain(raw).await;
    assert!(fragments.is_empty());
    let error = error.unwrap();
    assert_eq!(error.status_code(), Some(500));
    assert!(error.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn cancellation_aborts_pending_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = transport(&server, ServiceConfig::new("chat", "/chat"), StreamFormat::Sse);
    let ctx = InvocationContext::new();
    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel_with("caller went away");
    });

    let err = client
        .execute(TransportCall::post(&ctx, "chat", RequestBody::Json(json!({}))))
        .await
        .unwrap_err();
    assert!(err.is_cancellation());
    assert_eq!(err.to_string(), "caller went away");
}
