use std::sync::Arc;

use super::*;
use replysmith_protocols::{ChatMessage, LLMProvider};
use replysmith_runtime::HttpProviderClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest::new(
        "gpt-4o-mini",
        vec![ChatMessage::system("Be brief."), ChatMessage::user("Hello")],
    )
    .with_max_tokens(150)
    .with_temperature(0.8)
    .with_api_key("sk-test")
}

fn client(server: &MockServer) -> HttpProviderClient {
    let adapter = OpenAIAdapter::with_url(format!("{}/v1/chat/completions", server.uri()));
    HttpProviderClient::new(Arc::new(adapter)).unwrap()
}

#[test]
fn test_adapter_defaults() {
    let adapter = OpenAIAdapter::new();
    assert_eq!(adapter.id(), "openai");
    assert_eq!(adapter.api_url(), DEFAULT_API_URL);
    assert_eq!(adapter.endpoint("gpt-4o", "sk"), DEFAULT_API_URL);
}

#[test]
fn test_headers_use_bearer_auth() {
    let headers = OpenAIAdapter::new().headers("sk-abc");
    assert!(headers.contains(&("Authorization".to_string(), "Bearer sk-abc".to_string())));
}

#[test]
fn test_body_shape() {
    let body = OpenAIAdapter::new().build_body(&request()).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 150);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert!(body.get("api_key").is_none());
}

#[tokio::test]
async fn test_complete_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "max_tokens": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Great milestone!"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete(request()).await.unwrap();
    assert_eq!(text, "Great milestone!");
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).complete(request()).await.unwrap_err();
    match err {
        ProviderError::AuthenticationFailed(message) => {
            assert_eq!(message, "Incorrect API key provided")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_shape_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list"})))
        .mount(&server)
        .await;

    let err = client(&server).complete(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}
