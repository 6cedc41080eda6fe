use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::bridge::{InferenceEngine, WorkerBridge};
use replysmith_protocols::ChatMessage;

/// Fails with `WrongContext` a fixed number of times, then echoes.
struct PickyBackend {
    refusals: AtomicUsize,
    calls: AtomicUsize,
}

impl PickyBackend {
    fn new(refusals: usize) -> Self {
        Self {
            refusals: AtomicUsize::new(refusals),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LocalInferenceBackend for PickyBackend {
    fn id(&self) -> &str {
        "picky"
    }

    async fn run(&self, prompt: &str, _options: &LocalOptions) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let left = self.refusals.load(Ordering::SeqCst);
        if left > 0 {
            self.refusals.store(left - 1, Ordering::SeqCst);
            return Err(ProviderError::WrongContext("not here".to_string()));
        }
        Ok(format!("echo: {}", prompt))
    }
}

struct EchoEngine;

#[async_trait]
impl InferenceEngine for EchoEngine {
    async fn infer(&mut self, prompt: &str, _options: &LocalOptions) -> Result<String, ProviderError> {
        Ok(prompt.lines().last().unwrap_or_default().to_string())
    }
}

fn request() -> CompletionRequest {
    CompletionRequest::new(
        "on-device",
        vec![ChatMessage::system("Rules."), ChatMessage::user("Post body")],
    )
}

#[test]
fn test_render_prompt() {
    assert_eq!(render_prompt(&request()), "Rules.\n\nPost body");

    let no_system = CompletionRequest::new("m", vec![ChatMessage::user("Only")]);
    assert_eq!(render_prompt(&no_system), "Only");
}

#[tokio::test]
async fn test_provider_is_local() {
    let provider = LocalProvider::on_current_runtime(Arc::new(PickyBackend::new(0))).unwrap();
    assert!(provider.is_local());
    assert_eq!(provider.id(), "picky");
    assert_eq!(
        provider.complete(request()).await.unwrap(),
        "echo: Rules.\n\nPost body"
    );
}

#[tokio::test]
async fn test_wrong_context_is_redispatched_once() {
    let backend = Arc::new(PickyBackend::new(1));
    let provider = LocalProvider::on_current_runtime(backend.clone()).unwrap();

    let text = provider.complete(request()).await.unwrap();
    assert!(text.starts_with("echo: "));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_relay_failure_is_surfaced() {
    let backend = Arc::new(PickyBackend::new(2));
    let provider = LocalProvider::on_current_runtime(backend.clone()).unwrap();

    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::WrongContext(_)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_reached_from_foreign_thread() {
    let bridge = Arc::new(WorkerBridge::new(Box::new(EchoEngine), 2));
    let provider = Arc::new(LocalProvider::on_current_runtime(bridge).unwrap());

    // A plain thread has no tokio context, so the first attempt is refused
    // and the relay runs it on the test runtime.
    let result = tokio::task::spawn_blocking(move || {
        std::thread::spawn(move || futures::executor::block_on(provider.complete(request())))
            .join()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap(), "Post body");
}

#[test]
fn test_construction_needs_runtime() {
    let result = LocalProvider::on_current_runtime(Arc::new(PickyBackend::new(0)));
    assert!(matches!(result, Err(ProviderError::WrongContext(_))));
}
