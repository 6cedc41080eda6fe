//! In-memory state store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use replysmith_protocols::{StateStore, StoreError};

/// In-memory state store. Contents are lost when the process exits.
pub struct MemoryStateStore {
    documents: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.documents.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}
