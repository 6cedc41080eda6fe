//! Provider registry.

use std::sync::Arc;

use dashmap::DashMap;

use replysmith_protocols::LLMProvider;

use crate::error::PipelineError;

/// Registry of the providers a request can be routed to, keyed by ID.
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<dyn LLMProvider>>,
}

impl ProviderRegistry {
    /// Create a new provider registry.
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Register a provider.
    pub fn register(&self, provider: Arc<dyn LLMProvider>) -> Result<(), PipelineError> {
        let id = provider.id().to_string();

        if self.providers.contains_key(&id) {
            return Err(PipelineError::Config(format!(
                "Provider already registered: {}",
                id
            )));
        }

        self.providers.insert(id, provider);
        Ok(())
    }

    /// Get a provider by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(id).map(|p| p.clone())
    }

    /// Look up a provider, failing with a configuration error when unknown.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn LLMProvider>, PipelineError> {
        self.get(id)
            .ok_or_else(|| PipelineError::Config(format!("Unknown provider: {}", id)))
    }

    /// List all provider IDs, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
