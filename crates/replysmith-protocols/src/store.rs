//! Persistence port for pipeline state.
//!
//! Pipeline state (settings, rate-limit timestamps, comment history,
//! response cache, style profile) is kept as JSON documents under logical
//! keys. Adapters decide where the documents live.

use async_trait::async_trait;

use crate::error::StoreError;

/// Logical keys under which pipeline state is persisted.
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const RATE_LIMIT_TIMESTAMPS: &str = "rateLimitTimestamps";
    pub const COMMENT_HISTORY: &str = "commentHistory";
    pub const RESPONSE_CACHE: &str = "responseCache";
    pub const STYLE_PROFILE: &str = "styleProfile";
}

/// Key-value store holding JSON documents.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the document stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Replace the document stored under `key`.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Remove the document stored under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
