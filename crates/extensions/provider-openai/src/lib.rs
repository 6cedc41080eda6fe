//! OpenAI chat-completions adapter for replysmith.
//!
//! The wire types and conversion helpers are public so that other
//! OpenAI-compatible backends can reuse them.

pub mod api;
pub mod converter;
mod provider;

pub use provider::{OpenAIAdapter, DEFAULT_API_URL};
