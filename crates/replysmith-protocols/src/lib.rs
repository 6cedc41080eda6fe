//! # Replysmith Protocols
//!
//! Core protocol definitions (traits) and shared data types for the
//! replysmith comment-generation pipeline.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`LLMProvider`] - Uniform completion interface used by the orchestrator
//! - [`ProviderAdapter`] - Per-backend HTTP request/response shaping
//! - [`LocalInferenceBackend`] - On-device inference behind a single `run` call
//! - [`StateStore`] - Persistence port for pipeline state
//! - [`Clock`] - Time source and sleep, injectable for tests

pub mod clock;
pub mod error;
pub mod provider;
pub mod store;
pub mod types;

// Re-export core traits
pub use clock::Clock;
pub use provider::{
    CompletionRequest, LLMProvider, LocalInferenceBackend, LocalOptions, ProviderAdapter,
};
pub use store::StateStore;
pub use error::{ProviderError, ProviderErrorKind, StoreError};
pub use types::*;
