//! File-based state store implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use replysmith_protocols::{StateStore, StoreError};

/// Stores each key as `<directory>/<key>.json`.
pub struct FileStateStore {
    directory: PathBuf,
}

impl FileStateStore {
    /// Create a new file state store. The directory is created on first write.
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    pub(crate) fn document_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Backend(format!("Invalid state key: {:?}", key)));
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.document_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(&path).await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let path = self.document_path(key)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&value)?;

        // Readers never observe a half-written document.
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("Saved state key {} to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.document_path(key)?;

        if path.exists() {
            tokio::fs::remove_file(&path).await?;
            debug!("Deleted state file: {:?}", path);
        }
        Ok(())
    }
}
