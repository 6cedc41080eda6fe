use super::*;
use replysmith_protocols::ChatMessage;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Minimal echo-style adapter pointed at a mock server.
struct TestAdapter {
    base_url: String,
}

impl ProviderAdapter for TestAdapter {
    fn id(&self) -> &str {
        "test"
    }

    fn endpoint(&self, model: &str, _api_key: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![("Authorization".to_string(), format!("Bearer {}", api_key))]
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, ProviderError> {
        Ok(json!({
            "prompt": request.messages.last().map(|m| m.content.clone()),
            "max_tokens": request.max_tokens,
        }))
    }

    fn parse_response(&self, body: serde_json::Value) -> Result<String, ProviderError> {
        body["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProviderError::InvalidResponse("missing text".to_string()))
    }
}

fn client(server: &MockServer) -> HttpProviderClient {
    HttpProviderClient::new(Arc::new(TestAdapter {
        base_url: server.uri(),
    }))
    .unwrap()
}

fn request() -> CompletionRequest {
    CompletionRequest::new("tiny", vec![ChatMessage::user("Hello")])
        .with_max_tokens(50)
        .with_api_key("sk-test")
}

#[tokio::test]
async fn test_complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/tiny"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"prompt": "Hello", "max_tokens": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Hi!"})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client(&server).complete(request()).await.unwrap(), "Hi!");
}

#[tokio::test]
async fn test_missing_api_key() {
    let server = MockServer::start().await;
    let result = client(&server)
        .complete(CompletionRequest::new("tiny", vec![]))
        .await;
    assert!(matches!(result, Err(ProviderError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "Incorrect API key"}})),
        )
        .mount(&server)
        .await;

    match client(&server).complete(request()).await {
        Err(ProviderError::AuthenticationFailed(msg)) => assert_eq!(msg, "Incorrect API key"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .mount(&server)
        .await;

    let result = client(&server).complete(request()).await;
    assert!(matches!(
        result,
        Err(ProviderError::RateLimited {
            retry_after_seconds: Some(5)
        })
    ));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).complete(request()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn test_non_json_body_is_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client(&server).complete(request()).await;
    assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"text": "late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = HttpProviderClient::with_timeout(
        Arc::new(TestAdapter {
            base_url: server.uri(),
        }),
        Duration::from_millis(50),
    )
    .unwrap();

    let result = client.complete(request()).await;
    assert!(matches!(result, Err(ProviderError::Timeout(_))));
}

#[test]
fn test_parse_retry_after() {
    assert_eq!(parse_retry_after("5"), Some(5));
    assert_eq!(parse_retry_after(" 12 "), Some(12));
    assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
}
