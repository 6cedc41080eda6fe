//! Style profile persistence.

use std::sync::Arc;

use tracing::info;

use replysmith_protocols::store::keys;
use replysmith_protocols::{Settings, StoreError, StyleProfile};

use crate::state::PipelineState;

/// Holds the learned voice profile. The orchestrator only reads it; the
/// external learner (or the CLI) writes it.
pub struct StyleProfileStore {
    state: Arc<PipelineState>,
}

impl StyleProfileStore {
    pub fn new(state: Arc<PipelineState>) -> Self {
        Self { state }
    }

    /// Stored profile, or the defaults when none has been learned yet.
    pub async fn get(&self) -> Result<StyleProfile, StoreError> {
        self.state.read(keys::STYLE_PROFILE).await
    }

    /// Profile for a request: a per-request override wins over the stored one.
    pub async fn resolve(&self, settings: &Settings) -> Result<StyleProfile, StoreError> {
        match &settings.style_profile {
            Some(profile) => Ok(profile.clone()),
            None => self.get().await,
        }
    }

    pub async fn set(&self, profile: &StyleProfile) -> Result<(), StoreError> {
        let _guard = self.state.lock(keys::STYLE_PROFILE).await;
        self.state.save(keys::STYLE_PROFILE, profile).await?;
        info!("Style profile updated");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.state.reset(keys::STYLE_PROFILE).await
    }
}
