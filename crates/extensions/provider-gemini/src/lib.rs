//! Google Gemini adapter for replysmith.

mod provider;
mod types;

pub use provider::{GeminiAdapter, BASE_URL};
