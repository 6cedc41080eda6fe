//! OpenAI adapter.

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{CompletionRequest, ProviderAdapter};

use crate::converter::{build_request, extract_text};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Request shaping for the OpenAI chat-completions API.
pub struct OpenAIAdapter {
    api_url: String,
}

impl OpenAIAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Create an adapter with a custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Default for OpenAIAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn id(&self) -> &str {
        "openai"
    }

    fn endpoint(&self, _model: &str, _api_key: &str) -> String {
        self.api_url.clone()
    }

    fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", api_key)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, ProviderError> {
        serde_json::to_value(build_request(request))
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))
    }

    fn parse_response(&self, body: serde_json::Value) -> Result<String, ProviderError> {
        extract_text(body)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
