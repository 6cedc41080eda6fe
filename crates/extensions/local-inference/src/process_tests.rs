use super::*;

fn sh(script: &str) -> ProcessBackend {
    ProcessBackend::new("sh", vec!["-c".to_string(), script.to_string()])
}

fn options() -> LocalOptions {
    LocalOptions {
        max_tokens: 64,
        temperature: 0.25,
    }
}

#[tokio::test]
async fn test_prompt_goes_through_stdin() {
    let out = sh("cat").run("  Nice launch!\n", &options()).await.unwrap();
    assert_eq!(out, "Nice launch!");
}

#[tokio::test]
async fn test_options_are_exported() {
    let out = sh("echo \"$REPLYSMITH_MAX_TOKENS/$REPLYSMITH_TEMPERATURE\"")
        .run("ignored", &options())
        .await
        .unwrap();
    assert_eq!(out, "64/0.25");
}

#[tokio::test]
async fn test_failure_status_includes_stderr() {
    let err = sh("echo 'model missing' >&2; exit 3")
        .run("x", &options())
        .await
        .unwrap_err();
    match err {
        ProviderError::LocalBackend(message) => assert!(message.contains("model missing")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_output_is_error() {
    let err = sh("true").run("x", &options()).await.unwrap_err();
    assert!(matches!(err, ProviderError::LocalBackend(_)));
}

#[tokio::test]
async fn test_missing_command() {
    let backend = ProcessBackend::new("replysmith-no-such-binary", vec![]);
    let err = backend.run("x", &options()).await.unwrap_err();
    match err {
        ProviderError::LocalBackend(message) => assert!(message.contains("failed to start")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_command_times_out() {
    let backend = sh("sleep 5").with_timeout(Duration::from_millis(200));
    let err = backend.run("x", &options()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout(_)));
}

#[test]
fn test_outside_runtime_is_wrong_context() {
    let err = futures::executor::block_on(sh("cat").run("x", &options())).unwrap_err();
    assert!(matches!(err, ProviderError::WrongContext(_)));
}
