//! Shared pipeline state.
//!
//! Every component that persists something goes through [`PipelineState`],
//! which pairs a [`StateStore`] with one async mutex per logical key so that
//! overlapping requests cannot interleave a read-modify-write on the same
//! document.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use replysmith_protocols::{StateStore, StoreError};

/// Typed access to the state store with per-key critical sections.
pub struct PipelineState {
    store: Arc<dyn StateStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PipelineState {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Acquire the critical section for `key`.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Read the document under `key`, falling back to `T::default()` when it
    /// is missing or no longer matches the expected shape.
    pub async fn load<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let value = match self.store.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(T::default()),
            Err(StoreError::Malformed { reason, .. }) => {
                warn!("Discarding unreadable state under '{}': {}", key, reason);
                return Ok(T::default());
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!("Discarding malformed state under '{}': {}", key, e);
                Ok(T::default())
            }
        }
    }

    /// Replace the document under `key`.
    pub async fn save<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.store.set(key, json).await
    }

    /// Load, mutate and save the document under `key` while holding its lock.
    pub async fn update<T, R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default + Send,
        F: FnOnce(&mut T) -> R + Send,
        R: Send,
    {
        let _guard = self.lock(key).await;
        let mut value: T = self.load(key).await?;
        let result = f(&mut value);
        self.save(key, &value).await?;
        Ok(result)
    }

    /// Read the document under `key` while holding its lock.
    pub async fn read<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let _guard = self.lock(key).await;
        self.load(key).await
    }

    /// Drop the document under `key`.
    pub async fn reset(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock(key).await;
        self.store.remove(key).await
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
