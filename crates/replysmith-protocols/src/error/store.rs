//! State store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document exists but cannot be parsed.
    #[error("Malformed document '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}
