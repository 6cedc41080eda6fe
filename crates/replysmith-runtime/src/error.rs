//! Pipeline errors.

use thiserror::Error;

use replysmith_protocols::{ProviderError, StoreError};

use crate::gate::BlockReason;

/// Everything that can end a generate request without a comment.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing credentials, unknown provider.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    AdmissionBlocked(BlockReason),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Request superseded by a newer one")]
    Superseded,
}

impl From<BlockReason> for PipelineError {
    fn from(reason: BlockReason) -> Self {
        PipelineError::AdmissionBlocked(reason)
    }
}
