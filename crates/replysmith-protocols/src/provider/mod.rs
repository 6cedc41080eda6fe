//! LLM Provider protocol definitions.
//!
//! Remote providers are described by a [`ProviderAdapter`] (endpoint,
//! headers, body, response extraction) and executed by a shared HTTP
//! client; local providers implement [`LocalInferenceBackend`]. Both are
//! exposed to the orchestrator as an [`LLMProvider`].

mod request;
mod traits;

pub use request::*;
pub use traits::*;
