//! OpenRouter adapter for replysmith.
//!
//! OpenRouter speaks the OpenAI chat-completions format, so request and
//! response shaping is shared with `replysmith-provider-openai`. Only the
//! endpoint and the attribution headers differ.

mod provider;

pub use provider::{OpenRouterAdapter, APP_TITLE, APP_URL, DEFAULT_API_URL};
