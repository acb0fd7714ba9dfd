#![cfg(feature = "blocking")]

use bedrock_proxy_ox::{
    BedrockProxyBlocking, ChatMessage, ChatRequest, ClientConfig, ContentPart, ProxyRequestError,
};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "bedrock-api-key-dGVzdC10b2tlbg==";

/// Run blocking client code off the async runtime's worker threads
async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({
            "model": "claude-3-sonnet",
            "max_tokens": 300,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A single pixel."}}],
            "usage": {"total_tokens": 42}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let response = run_blocking(move || {
        let client = BedrockProxyBlocking::new(uri, TOKEN)?;
        let request = ChatRequest::builder()
            .model("claude-3-sonnet")
            .user_parts(vec![
                ContentPart::text("What do you see in this image?"),
                ContentPart::image_base64("image/jpeg", b"\xff\xd8\xff"),
            ])
            .temperature(0.5)
            .max_tokens(300)
            .build();
        client.chat_completion(&request)
    })
    .await
    .expect("blocking chat should succeed");

    assert_eq!(response.content(), Some("A single pixel."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_list_models_is_bodyless_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "gpt-4"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = format!("{}/", server.uri());
    let models = run_blocking(move || BedrockProxyBlocking::new(uri, TOKEN)?.list_models())
        .await
        .expect("blocking list should succeed");
    assert_eq!(models.ids(), vec!["gpt-4"]);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v1/models");
    assert!(requests[0].body.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_error_taxonomy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (chat, models, empty) = run_blocking(move || {
        let client = BedrockProxyBlocking::new(uri, TOKEN).expect("client");
        (
            client.chat(vec![ChatMessage::user("Hello")], "gpt-4"),
            client.list_models(),
            client.chat(Vec::new(), "gpt-4"),
        )
    })
    .await;

    assert!(matches!(
        chat,
        Err(ProxyRequestError::HttpStatus { status: 401, ref body }) if body == "denied"
    ));
    assert!(matches!(models, Err(ProxyRequestError::Decode { .. })));
    assert!(matches!(empty, Err(ProxyRequestError::InvalidRequest(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = run_blocking(move || {
        let config = ClientConfig::new(uri, TOKEN)
            .expect("valid config")
            .with_models_timeout(Duration::from_millis(200));
        BedrockProxyBlocking::with_config(config)
            .expect("client")
            .list_models()
    })
    .await
    .expect_err("timeout must fail");

    assert!(matches!(err, ProxyRequestError::Transport(_)));
    assert!(err.is_timeout());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_and_async_send_identical_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .expect(2)
        .mount(&server)
        .await;

    let request = ChatRequest::builder()
        .system_message("You are a helpful AWS expert.")
        .user_message("What is AWS Bedrock?")
        .build();

    let async_client =
        bedrock_proxy_ox::BedrockProxy::new(server.uri(), TOKEN).expect("async client");
    async_client
        .chat_completion(&request)
        .await
        .expect("async call");

    let uri = server.uri();
    let blocking_request = request.clone();
    run_blocking(move || {
        BedrockProxyBlocking::new(uri, TOKEN)?.chat_completion(&blocking_request)
    })
    .await
    .expect("blocking call");

    let requests = server.received_requests().await.expect("recording enabled");
    let bodies: Vec<Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("json body"))
        .collect();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}
