//! Anthropic messages adapter for replysmith.

mod api;
mod converter;
mod parser;
mod provider;

pub use provider::{AnthropicAdapter, API_URL, API_VERSION};
