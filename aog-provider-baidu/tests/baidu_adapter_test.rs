use aog_core::prelude::*;
use aog_provider_baidu::{BaiduAdapter, BaiduConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = r#"{"api_key":"bce-v3/ALTAK-test"}"#;

fn adapter(server: &MockServer) -> BaiduAdapter {
    let config = BaiduConfig::default()
        .with_base_url(server.uri())
        .with_service(
            ServiceConfig::new("text-to-speech", "/rpc/2.0/tts/v1/create")
                .with_auth_type(AuthType::ApiKey)
                .with_extra_headers(r#"{"X-Appbuilder-From":"aog","retries":3}"#),
        );
    BaiduAdapter::new(config).unwrap()
}

#[tokio::test]
async fn offers_four_services() {
    let server = MockServer::start().await;
    assert_eq!(
        adapter(&server).capabilities(),
        vec![
            (ServiceKind::Chat, DispatchCapability::Both),
            (ServiceKind::Embed, DispatchCapability::Unary),
            (ServiceKind::ImageToImage, DispatchCapability::Unary),
            (ServiceKind::TextToSpeech, DispatchCapability::Unary),
        ]
    );
}

#[tokio::test]
async fn embed_is_forwarded_verbatim() {
    let server = MockServer::start().await;
    let data = json!({ "model": "embedding-v1", "input": ["a", "b"] });
    let payload = json!({
        "object": "list",
        "data": [{ "index": 0, "embedding": [0.1] }, { "index": 1, "embedding": [0.2] }]
    });
    Mock::given(method("POST"))
        .and(path("/v2/embeddings"))
        .and(header("authorization", "Bearer bce-v3/ALTAK-test"))
        .and(body_json(data.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = InvocationContext::new().with_auth_info(AUTH);
    let request = serde_json::to_vec(&json!({ "service": "embed", "data": data })).unwrap();
    let bytes = adapter(&server)
        .invoke_service(&ctx, "embed", &request)
        .await
        .unwrap();
    let response = ServiceResponse::decode(&bytes).unwrap();
    assert_eq!(serde_json::Value::Object(response.data), payload);
}

#[tokio::test]
async fn speech_sends_string_extra_headers_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc/2.0/tts/v1/create"))
        .and(header("x-appbuilder-from", "aog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": "tts-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = InvocationContext::new().with_auth_info(AUTH);
    let bytes = adapter(&server)
        .invoke_service(
            &ctx,
            "text-to-speech",
            br#"{"service":"text-to-speech","data":{"text":["hello"],"format":"mp3-16k"}}"#,
        )
        .await
        .unwrap();
    assert_eq!(ServiceResponse::decode(&bytes).unwrap().data["task_id"], "tts-1");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("retries").is_none());
}

#[tokio::test]
async fn image_to_image_without_endpoint_is_a_configuration_error() {
    let server = MockServer::start().await;
    let ctx = InvocationContext::new().with_auth_info(AUTH);
    let err = adapter(&server)
        .invoke_service(
            &ctx,
            "image-to-image",
            br#"{"service":"image-to-image","data":{}}"#,
        )
        .await
        .unwrap_err();
    assert!(matches!(err.root(), AdapterError::ConfigurationError(_)));
    assert!(err.to_string().starts_with("baidu image-to-image failed:"));
}

#[tokio::test]
async fn chat_stream_error_mid_stream_follows_delivered_frames() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"id\":\"as-1\",\"result\":\"Hel\"}\n\n",
        "data: {not json}\n\n",
        "data: {\"id\":\"as-1\",\"result\":\"lo\"}\n\n"
    );
    Mock::given(method("POST"))
        .and(path("/v2/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let ctx = InvocationContext::new().with_auth_info(AUTH);
    let mut rx = adapter(&server).invoke_service_stream(
        ctx,
        "chat",
        br#"{"service":"chat","data":{"stream":true}}"#.to_vec(),
    );
    let first = rx.recv().await.unwrap();
    assert_eq!(
        first.data.as_deref(),
        Some(&b"data: {\"id\":\"as-1\",\"result\":\"Hel\"}\n\n"[..])
    );
    let terminal = rx.recv().await.unwrap();
    let error = terminal.error.unwrap();
    assert!(matches!(error.root(), AdapterError::DecodeError(_)));
    assert!(rx.recv().await.is_none());
}
