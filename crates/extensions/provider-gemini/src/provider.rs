//! Gemini adapter.

use replysmith_protocols::error::{extract_error_message, ProviderError};
use replysmith_protocols::provider::{CompletionRequest, ProviderAdapter};
use replysmith_protocols::MessageRole;

use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request shaping for the Gemini `generateContent` API.
pub struct GeminiAdapter {
    base_url: String,
}

impl GeminiAdapter {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_request(request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .conversation()
            .map(|m| Content {
                role: Some(match m.role {
                    MessageRole::Assistant => "model".to_string(),
                    _ => "user".to_string(),
                }),
                parts: vec![Part::text(m.content.clone())],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: request.system_prompt().map(|text| Content {
                role: None,
                parts: vec![Part::text(text)],
            }),
            generation_config: GenerationConfig {
                temperature: Some(request.temperature),
                max_output_tokens: Some(request.max_tokens),
            },
        }
    }
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn id(&self) -> &str {
        "gemini"
    }

    fn endpoint(&self, model: &str, api_key: &str) -> String {
        let key: String = url::form_urlencoded::byte_serialize(api_key.as_bytes()).collect();
        format!("{}/models/{}:generateContent?key={}", self.base_url, model, key)
    }

    fn headers(&self, _api_key: &str) -> Vec<(String, String)> {
        vec![("Content-Type".to_string(), "application/json".to_string())]
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, ProviderError> {
        serde_json::to_value(Self::build_request(request))
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))
    }

    fn parse_response(&self, body: serde_json::Value) -> Result<String, ProviderError> {
        let response: GenerateContentResponse = serde_json::from_value(body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }

    // Gemini reports a bad key as 400 INVALID_ARGUMENT.
    fn classify_error(
        &self,
        status: u16,
        body: &str,
        retry_after_seconds: Option<u64>,
    ) -> ProviderError {
        let message = extract_error_message(body);
        if status == 400 && (body.contains("API_KEY_INVALID") || message.contains("API key not valid")) {
            return ProviderError::AuthenticationFailed(message);
        }
        ProviderError::from_api_response(status, message, retry_after_seconds)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
