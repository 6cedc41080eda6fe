//! Conversion between protocol requests and the OpenAI wire format.

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::CompletionRequest;

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

/// Build the chat-completions request body.
pub fn build_request(request: &CompletionRequest) -> ApiRequest {
    ApiRequest {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Extract `choices[0].message.content` from a response body.
pub fn extract_text(body: serde_json::Value) -> Result<String, ProviderError> {
    let response: ApiResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        ProviderError::InvalidResponse(format!(
            "choices[0] has no content (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })
}
