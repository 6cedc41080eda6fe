//! End-to-end tests: orchestrator, file-backed state and the OpenAI adapter
//! against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use replysmith_config::Config;
use replysmith_protocols::store::keys;
use replysmith_protocols::{Author, GenerateRequest, Settings};
use replysmith_provider_openai::OpenAIAdapter;
use replysmith_runtime::cache::CacheMap;
use replysmith_runtime::{
    fingerprint, CommentOrchestrator, FileStateStore, HttpProviderClient, ManualClock,
    PipelineState, ProviderRegistry,
};

const COMMENT: &str = "Congrats on the raise — what's next for the team?";

// ============================================================================
// Test Helpers
// ============================================================================

struct Pipeline {
    orchestrator: CommentOrchestrator,
    state: Arc<PipelineState>,
    clock: Arc<ManualClock>,
    _dir: TempDir,
}

fn pipeline(server: &MockServer) -> Pipeline {
    let adapter = OpenAIAdapter::with_url(format!("{}/v1/chat/completions", server.uri()));
    let registry = Arc::new(ProviderRegistry::new());
    registry
        .register(Arc::new(HttpProviderClient::new(Arc::new(adapter)).unwrap()))
        .unwrap();

    let dir = TempDir::new().unwrap();
    let state = Arc::new(PipelineState::new(Arc::new(FileStateStore::new(
        dir.path().to_path_buf(),
    ))));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
    ));
    let orchestrator =
        CommentOrchestrator::new(registry, state.clone(), clock.clone(), &Config::default())
            .with_cache_seed(11);

    Pipeline {
        orchestrator,
        state,
        clock,
        _dir: dir,
    }
}

fn series_a() -> GenerateRequest {
    GenerateRequest::new(
        "Excited to announce our Series A!",
        Author::new("Jane Doe", "Founder"),
    )
}

fn settings() -> Settings {
    Settings {
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    }
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
    }))
}

/// Stage 1 asks for 200 tokens; stage 2 uses the settings budget of 150.
async fn mount_happy_path(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"max_tokens": 200})))
        .respond_with(chat_reply(
            r#"{"focalPoint": "funding announcement", "recommendedTone": "supportive"}"#,
        ))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"max_tokens": 150})))
        .respond_with(chat_reply(&format!("\"{}\"", COMMENT)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_series_a_announcement() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 1).await;
    let pipeline = pipeline(&server);

    let result = pipeline.orchestrator.generate(&series_a(), &settings()).await;

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.comment.as_deref(), Some(COMMENT));
    assert!(!result.from_cache);
    let analysis = result.analysis.unwrap();
    assert_eq!(analysis.focal_point, "funding announcement");
    assert_eq!(analysis.recommended_tone, "supportive");
    assert_eq!(result.rate_limit_status.unwrap().remaining, 9);

    let cache: CacheMap = pipeline.state.read(keys::RESPONSE_CACHE).await.unwrap();
    let entry = cache.get(&fingerprint(&series_a())).expect("cache entry for the post");
    assert_eq!(entry.responses, vec![COMMENT.to_string()]);

    let history = pipeline.orchestrator.gate().history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, COMMENT);
}

#[tokio::test]
async fn test_repeat_post_served_from_cache() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 1).await;
    let pipeline = pipeline(&server);

    let first = pipeline.orchestrator.generate(&series_a(), &settings()).await;
    assert!(first.success);

    pipeline.clock.advance(Duration::from_secs(120));
    let second = pipeline.orchestrator.generate(&series_a(), &settings()).await;

    assert!(second.success, "error: {:?}", second.error);
    assert!(second.from_cache);
    assert!(second.comment.is_some());
    // Cache hits do not count against the hourly budget.
    assert_eq!(second.rate_limit_status.unwrap().remaining, 9);
}

#[tokio::test]
async fn test_rate_limited_call_waits_for_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_happy_path(&server, 1).await;
    let pipeline = pipeline(&server);

    let result = pipeline.orchestrator.generate(&series_a(), &settings()).await;

    assert!(result.success, "error: {:?}", result.error);
    assert!(pipeline.clock.total_slept() >= Duration::from_secs(5));
}

#[tokio::test]
async fn test_rejected_key_fails_without_recording() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let pipeline = pipeline(&server);

    let result = pipeline.orchestrator.generate(&series_a(), &settings()).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Incorrect API key provided"));
    assert_eq!(pipeline.orchestrator.gate().status().await.unwrap().remaining, 10);
    assert_eq!(pipeline.orchestrator.cache().stats().await.unwrap().entries, 0);
}
