//! Anthropic adapter.

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{CompletionRequest, ProviderAdapter};

use crate::converter::build_request;
use crate::parser::extract_text;

pub const API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const API_VERSION: &str = "2023-06-01";

/// Request shaping for the Anthropic messages API.
pub struct AnthropicAdapter {
    api_url: String,
}

impl AnthropicAdapter {
    pub fn new() -> Self {
        Self::with_url(API_URL)
    }

    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl Default for AnthropicAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn endpoint(&self, _model: &str, _api_key: &str) -> String {
        self.api_url.clone()
    }

    fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            ("x-api-key".to_string(), api_key.to_string()),
            ("anthropic-version".to_string(), API_VERSION.to_string()),
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
