//! Completion request types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, MessageRole};

/// Request for a completion.
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to use.
    pub model: String,

    /// Messages in the conversation, system prompt included.
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0).
    pub temperature: f32,

    /// Credential for remote providers. Never serialized.
    #[serde(skip)]
    pub api_key: String,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: 150,
            temperature: 0.7,
            api_key: String::new(),
        }
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// All system messages joined, for providers with a separate system field.
    pub fn system_prompt(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }

    /// Messages without the system role.
    pub fn conversation(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != MessageRole::System)
    }
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("messages", &self.messages)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Options passed to a local inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&CompletionRequest> for LocalOptions {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
