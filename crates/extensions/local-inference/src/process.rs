//! Subprocess inference backend.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{LocalInferenceBackend, LocalOptions};

use crate::bridge::InferenceEngine;
use crate::current_runtime;

pub const LOCAL_PROCESS_ID: &str = "local-process";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `command args...` once per prompt.
///
/// The prompt is written to stdin and the trimmed stdout is the answer.
/// Generation options are passed as `REPLYSMITH_MAX_TOKENS` and
/// `REPLYSMITH_TEMPERATURE`.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessBackend {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    async fn execute(&self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError> {
        debug!("Running local inference command: {}", self.command);

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .env("REPLYSMITH_MAX_TOKENS", options.max_tokens.to_string())
            .env("REPLYSMITH_TEMPERATURE", options.temperature.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ProviderError::LocalBackend(format!("failed to start {}: {}", self.command, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A command that ignores its input closes the pipe early.
            if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(ProviderError::LocalBackend(e.to_string()));
                }
            }
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ProviderError::LocalBackend(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::LocalBackend(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::LocalBackend(format!(
                "{} produced no output",
                self.command
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl LocalInferenceBackend for ProcessBackend {
    fn id(&self) -> &str {
        LOCAL_PROCESS_ID
    }

    async fn run(&self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError> {
        current_runtime(LOCAL_PROCESS_ID)?;
        self.execute(prompt, options).await
    }
}

#[async_trait]
impl InferenceEngine for ProcessBackend {
    async fn infer(&mut self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError> {
        self.execute(prompt, options).await
    }
}

#[cfg(all(test, unix))]
#[path = "process_tests.rs"]
mod tests;
