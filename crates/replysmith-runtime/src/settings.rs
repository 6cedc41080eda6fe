//! Persisted user settings.

use std::sync::Arc;

use tracing::info;

use replysmith_protocols::store::keys;
use replysmith_protocols::{Settings, StoreError};

use crate::state::PipelineState;

/// Settings saved by a front end, layered over the configured ones.
pub struct SettingsStore {
    state: Arc<PipelineState>,
}

impl SettingsStore {
    pub fn new(state: Arc<PipelineState>) -> Self {
        Self { state }
    }

    /// Stored settings, if any were saved.
    pub async fn get(&self) -> Result<Option<Settings>, StoreError> {
        self.state.read(keys::SETTINGS).await
    }

    /// Stored settings when present, otherwise `base`. A stored document
    /// without an API key keeps the key from `base` if both name the same
    /// provider.
    pub async fn resolve(&self, base: &Settings) -> Result<Settings, StoreError> {
        Ok(match self.get().await? {
            Some(mut stored) => {
                if stored.api_key().is_none() && stored.provider == base.provider {
                    stored.api_key = base.api_key.clone();
                }
                stored
            }
            None => base.clone(),
        })
    }

    pub async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
        let _guard = self.state.lock(keys::SETTINGS).await;
        self.state.save(keys::SETTINGS, settings).await?;
        info!(provider = %settings.provider, model = %settings.model, "Settings updated");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.state.reset(keys::SETTINGS).await
    }
}
