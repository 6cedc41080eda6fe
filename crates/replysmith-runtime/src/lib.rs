//! # Replysmith Runtime
//!
//! The comment-generation pipeline: fingerprinting, semantic cache,
//! admission gate, provider retry and the two-stage orchestrator.

pub mod cache;
pub mod clock;
pub mod error;
pub mod file_store;
pub mod fingerprint;
pub mod gate;
pub mod memory_store;
pub mod orchestrator;
pub mod prompts;
pub mod registry;
pub mod retry;
pub mod settings;
pub mod state;
pub mod style;
pub mod transport;
mod variation;

pub use cache::{CacheEntry, CacheStats, SemanticCache};
pub use clock::{ManualClock, SystemClock};
pub use error::PipelineError;
pub use file_store::FileStateStore;
pub use fingerprint::{fingerprint, PostFingerprint};
pub use gate::{AdmissionGate, BlockReason, HistoryEntry, PatternWarning};
pub use memory_store::MemoryStateStore;
pub use orchestrator::{CommentOrchestrator, RequestPhase};
pub use registry::ProviderRegistry;
pub use retry::{is_retryable, RetryConfig, RetryProvider};
pub use settings::SettingsStore;
pub use state::PipelineState;
pub use style::StyleProfileStore;
pub use transport::HttpProviderClient;
pub use variation::VariationStrategy;

pub use tokio_util::sync::CancellationToken;
