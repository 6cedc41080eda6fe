use std::sync::Arc;

use super::*;
use replysmith_protocols::{ChatMessage, LLMProvider};
use replysmith_runtime::HttpProviderClient;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest::new(
        "meta-llama/llama-3.1-8b-instruct",
        vec![ChatMessage::user("Hello")],
    )
    .with_api_key("or-test")
}

fn client(server: &MockServer) -> HttpProviderClient {
    let adapter = OpenRouterAdapter::with_url(format!("{}/api/v1/chat/completions", server.uri()));
    HttpProviderClient::new(Arc::new(adapter)).unwrap()
}

#[test]
fn test_adapter_identity() {
    let adapter = OpenRouterAdapter::new();
    assert_eq!(adapter.id(), "openrouter");
    assert_eq!(adapter.endpoint("x", "y"), DEFAULT_API_URL);
}

#[test]
fn test_attribution_headers() {
    let headers = OpenRouterAdapter::new().headers("or-key");
    assert!(headers.contains(&("Authorization".to_string(), "Bearer or-key".to_string())));
    assert!(headers.contains(&("HTTP-Referer".to_string(), APP_URL.to_string())));
    assert!(headers.contains(&("X-Title".to_string(), APP_TITLE.to_string())));
}

#[tokio::test]
async fn test_complete_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("Authorization", "Bearer or-test"))
        .and(header("X-Title", APP_TITLE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Huge news!"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete(request()).await.unwrap();
    assert_eq!(text, "Huge news!");
}

#[test]
fn test_embedded_upstream_error() {
    let adapter = OpenRouterAdapter::new();
    let err = adapter
        .parse_response(json!({"error": {"code": 503, "message": "No endpoints available"}}))
        .unwrap_err();
    assert!(matches!(err, ProviderError::ApiError { status: 503, .. }));
    assert!(err.is_retryable());

    let err = adapter
        .parse_response(json!({"error": {"code": 429, "message": "Slow down"}}))
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[test]
fn test_missing_choices_is_invalid_response() {
    let err = OpenRouterAdapter::new().parse_response(json!({})).unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}
