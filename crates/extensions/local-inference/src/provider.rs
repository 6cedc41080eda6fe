//! `LLMProvider` over a local backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::debug;

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{CompletionRequest, LLMProvider, LocalInferenceBackend, LocalOptions};

/// Flatten a chat request into one prompt: system text first, then each
/// remaining message, separated by blank lines.
pub fn render_prompt(request: &CompletionRequest) -> String {
    request
        .system_prompt()
        .into_iter()
        .chain(request.conversation().map(|m| m.content.clone()))
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Exposes a [`LocalInferenceBackend`] to the orchestrator.
///
/// A backend that reports `WrongContext` is retried once on the relay
/// runtime captured at construction.
pub struct LocalProvider {
    backend: Arc<dyn LocalInferenceBackend>,
    relay: Handle,
}

impl LocalProvider {
    pub fn new(backend: Arc<dyn LocalInferenceBackend>, relay: Handle) -> Self {
        Self { backend, relay }
    }

    /// Build with the current runtime as the relay.
    pub fn on_current_runtime(backend: Arc<dyn LocalInferenceBackend>) -> Result<Self, ProviderError> {
        let relay = crate::current_runtime(backend.id())?;
        Ok(Self::new(backend, relay))
    }

    async fn relay_run(&self, prompt: String, options: LocalOptions) -> Result<String, ProviderError> {
        let backend = self.backend.clone();
        self.relay
            .spawn(async move { backend.run(&prompt, &options).await })
            .await
            .map_err(|e| ProviderError::LocalBackend(format!("relay task failed: {}", e)))?
    }
}

#[async_trait]
impl LLMProvider for LocalProvider {
    fn id(&self) -> &str {
        self.backend.id()
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let prompt = render_prompt(&request);
        let options = LocalOptions::from(&request);

        match self.backend.run(&prompt, &options).await {
            Err(ProviderError::WrongContext(reason)) => {
                debug!("Re-dispatching {} through relay: {}", self.backend.id(), reason);
                self.relay_run(prompt, options).await
            }
            result => result,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
