//! OpenRouter adapter.

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{CompletionRequest, ProviderAdapter};
use replysmith_provider_openai::converter::{build_request, extract_text};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Sent as `HTTP-Referer` for OpenRouter app attribution.
pub const APP_URL: &str = "https://github.com/replysmith/replysmith";
/// Sent as `X-Title`.
pub const APP_TITLE: &str = "Replysmith";

/// Request shaping for OpenRouter.
pub struct OpenRouterAdapter {
    api_url: String,
}

impl OpenRouterAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl Default for OpenRouterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for OpenRouterAdapter {
    fn id(&self) -> &str {
        "openrouter"
    }

    fn endpoint(&self, _model: &str, _api_key: &str) -> String {
        self.api_url.clone()
    }

    fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", api_key)),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("HTTP-Referer".to_string(), APP_URL.to_string()),
            ("X-Title".to_string(), APP_TITLE.to_string()),
        ]
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, ProviderError> {
        serde_json::to_value(build_request(request))
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))
    }

    fn parse_response(&self, body: serde_json::Value) -> Result<String, ProviderError> {
        // OpenRouter can return 200 with an upstream error object.
        if body.get("choices").is_none() {
            if let Some(message) = body["error"]["message"].as_str() {
                let status = body["error"]["code"].as_u64().unwrap_or(502) as u16;
                return Err(ProviderError::from_api_response(status, message.to_string(), None));
            }
        }
        extract_text(body)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
