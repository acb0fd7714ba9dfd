use bedrock_proxy_ox::{BedrockProxy, ChatMessage, ChatRequest, ClientConfig, ProxyRequestError};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "bedrock-api-key-dGVzdC10b2tlbg==";

fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
    })
}

fn client_for(server: &MockServer) -> BedrockProxy {
    BedrockProxy::new(server.uri(), TOKEN).expect("valid config")
}

#[tokio::test]
async fn test_chat_completion_sends_one_post_with_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "You are a helpful AWS expert assistant."},
                {"role": "user", "content": "What are the benefits of using AWS Bedrock?"}
            ],
            "temperature": 0.5,
            "max_tokens": 300,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Many.")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::builder()
        .model("gpt-4")
        .system_message("You are a helpful AWS expert assistant.")
        .user_message("What are the benefits of using AWS Bedrock?")
        .temperature(0.5)
        .max_tokens(300)
        .build();

    let response = client_for(&server)
        .chat_completion(&request)
        .await
        .expect("chat completion should succeed");

    assert_eq!(response.content(), Some("Many."));
    assert_eq!(response.usage().map(|u| u["total_tokens"].clone()), Some(json!(30)));
}

#[tokio::test]
async fn test_chat_shorthand_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi!")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat(vec![ChatMessage::user("Hello")], "gpt-3.5-turbo")
        .await
        .expect("chat should succeed");
    assert_eq!(response.content(), Some("Hi!"));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["temperature"].as_f64().map(|t| (t * 10.0).round()), Some(7.0));
    assert_eq!(body["max_tokens"], json!(1000));
    assert_eq!(body["stream"], json!(false));
}

#[tokio::test]
async fn test_stream_flag_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .mount(&server)
        .await;

    let request = ChatRequest::builder()
        .user_message("Hello")
        .stream(true)
        .build();
    client_for(&server)
        .chat_completion(&request)
        .await
        .expect("should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["stream"], json!(true));
}

#[tokio::test]
async fn test_unauthorized_is_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthorized"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .chat(vec![ChatMessage::user("Hello")], "gpt-4")
        .await
        .expect_err("401 must fail");

    match err {
        ProxyRequestError::HttpStatus { status, ref body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"message":"Unauthorized"}"#);
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert_eq!(err.api_message(), Some("Unauthorized".to_string()));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .chat(vec![ChatMessage::user("Hello")], "gpt-4")
        .await
        .expect_err("malformed body must fail");

    assert!(matches!(err, ProxyRequestError::Decode { ref body, .. } if body == "<html>oops</html>"));
}

#[tokio::test]
async fn test_slow_proxy_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), TOKEN)
        .expect("valid config")
        .with_chat_timeout(Duration::from_millis(200));
    let client = BedrockProxy::with_config(config).expect("client");

    let err = client
        .chat(vec![ChatMessage::user("Hello")], "gpt-4")
        .await
        .expect_err("timeout must fail");

    assert!(matches!(err, ProxyRequestError::Transport(_)));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_empty_messages_are_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("never")))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .chat(Vec::new(), "gpt-4")
        .await
        .expect_err("empty conversation must fail");

    assert!(matches!(err, ProxyRequestError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_list_models_sends_one_get_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"id": "gpt-3.5-turbo"}, {"id": "gpt-4"}, {"id": "claude-3-sonnet"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let models = client_for(&server)
        .list_models()
        .await
        .expect("list models should succeed");
    assert_eq!(models.ids(), vec!["gpt-3.5-turbo", "gpt-4", "claude-3-sonnet"]);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_list_models_error_taxonomy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_models()
        .await
        .expect_err("500 must fail");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_trailing_slash_base_url_has_no_double_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockProxy::new(format!("{}/", server.uri()), TOKEN).expect("client");
    assert_eq!(client.base_url(), server.uri());

    client.list_models().await.expect("list models should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests[0].url.path(), "/v1/models");
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dev/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockProxy::new(format!("{}/dev/", server.uri()), TOKEN).expect("client");
    client.list_models().await.expect("list models should succeed");
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = vec![ChatMessage::user("one")];
    let second = vec![ChatMessage::user("two")];
    let (a, b, models) = tokio::join!(
        client.chat(first, "gpt-4"),
        client.chat(second, "gpt-3.5-turbo"),
        client.list_models()
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(models.is_ok());
}

#[tokio::test]
async fn test_base_url_with_query_is_rejected_up_front() {
    let server = MockServer::start().await;

    let err = BedrockProxy::new(format!("{}/?x=1", server.uri()), TOKEN)
        .expect_err("query string must be rejected");
    assert!(matches!(err, ProxyRequestError::InvalidBaseUrl { .. }));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_token_unfit_for_header_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("never")))
        .expect(0)
        .mount(&server)
        .await;

    let err = BedrockProxy::new(server.uri(), "bedrock-api-key-ab\ncd")
        .expect_err("newline in token must be rejected");
    assert!(matches!(err, ProxyRequestError::InvalidToken(_)));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("user-agent", "bedrock-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), TOKEN)
        .expect("valid config")
        .with_user_agent("bedrock-tests/1.0");
    BedrockProxy::with_config(config)
        .expect("client")
        .list_models()
        .await
        .expect("list models should succeed");
}
