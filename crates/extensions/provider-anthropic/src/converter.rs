//! Request conversion for the Anthropic API.

use replysmith_protocols::provider::CompletionRequest;

use crate::api::{ApiMessage, ApiRequest};

/// Build the messages request. System messages move to the top-level
/// `system` field and consecutive turns from the same role are merged,
/// since the API requires alternating roles.
pub fn build_request(request: &CompletionRequest) -> ApiRequest {
    let mut messages: Vec<ApiMessage> = Vec::new();
    for message in request.conversation() {
        let role = message.role.as_str();
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&message.content);
            }
            _ => messages.push(ApiMessage {
                role: role.to_string(),
                content: message.content.clone(),
            }),
        }
    }

    ApiRequest {
        model: request.model.clone(),
        messages,
        system: request.system_prompt(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}
