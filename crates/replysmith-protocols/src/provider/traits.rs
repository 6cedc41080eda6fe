//! Provider trait definitions.

use async_trait::async_trait;

use super::{CompletionRequest, LocalOptions};
use crate::error::{extract_error_message, ProviderError};

/// Core trait for anything that can turn a chat request into text.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the provider ID (matches `Settings::provider`).
    fn id(&self) -> &str;

    /// Whether the provider runs on-device and needs no API key.
    fn is_local(&self) -> bool {
        false
    }

    /// Generate a completion and return its text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Request/response shaping for one remote HTTP backend.
pub trait ProviderAdapter: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Full request URL for `model`.
    fn endpoint(&self, model: &str, api_key: &str) -> String;

    /// Authentication and content headers.
    fn headers(&self, api_key: &str) -> Vec<(String, String)>;

    /// Provider-specific JSON request body.
    fn build_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, ProviderError>;

    /// Extract the generated text from a successful response body.
    fn parse_response(&self, body: serde_json::Value) -> Result<String, ProviderError>;

    /// Map a non-success response to an error.
    fn classify_error(
        &self,
        status: u16,
        body: &str,
        retry_after_seconds: Option<u64>,
    ) -> ProviderError {
        ProviderError::from_api_response(status, extract_error_message(body), retry_after_seconds)
    }
}

/// On-device inference path that bypasses HTTP.
#[async_trait]
pub trait LocalInferenceBackend: Send + Sync {
    /// Returns the backend ID.
    fn id(&self) -> &str;

    /// Run a single prompt to completion.
    async fn run(&self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError>;
}
