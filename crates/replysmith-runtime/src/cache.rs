//! Semantic response cache.
//!
//! Generated replies are stored under the post fingerprint. A fingerprint
//! keeps up to five variants; reads sample one of them and sometimes reword
//! it so the same text is never served twice in a row.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use replysmith_config::CacheConfig;
use replysmith_protocols::store::keys;
use replysmith_protocols::{Clock, StoreError};

use crate::state::PipelineState;
use crate::variation::vary;

/// Responses stored for one fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Oldest first.
    pub responses: Vec<String>,
    /// Time of the last write.
    pub timestamp: DateTime<Utc>,
    /// Text handed out by the previous hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_served: Option<String>,
}

impl CacheEntry {
    fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            responses: Vec::new(),
            timestamp,
            last_served: None,
        }
    }
}

/// Persisted cache document: fingerprint -> entry.
pub type CacheMap = HashMap<String, CacheEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub responses: usize,
}

pub struct SemanticCache {
    state: Arc<PipelineState>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    rng: Mutex<StdRng>,
}

impl SemanticCache {
    pub fn new(state: Arc<PipelineState>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            state,
            clock,
            config,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Use a fixed seed for sampling and variation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a response for `fingerprint`.
    pub async fn get(&self, fingerprint: &str) -> Result<Option<String>, StoreError> {
        let now = self.clock.now();

        self.state
            .update(keys::RESPONSE_CACHE, |cache: &mut CacheMap| {
                let expired = cache
                    .get(fingerprint)
                    .map(|entry| self.is_expired(entry, now) || entry.responses.is_empty())?;
                if expired {
                    debug!("Cache entry {} expired", fingerprint);
                    cache.remove(fingerprint);
                    return None;
                }

                let entry = cache.get_mut(fingerprint)?;
                let mut rng = self.rng.lock();

                let index = rng.random_range(0..entry.responses.len());
                let mut response = entry.responses[index].clone();

                if rng.random_bool(self.config.variation_probability.clamp(0.0, 1.0)) {
                    response = vary(&response, &mut *rng);
                }
                if entry.last_served.as_deref() == Some(response.as_str()) {
                    response = vary(&response, &mut *rng);
                }

                entry.last_served = Some(response.clone());
                Some(response)
            })
            .await
    }

    /// Store `response` under `fingerprint` and run eviction.
    pub async fn set(&self, fingerprint: &str, response: &str) -> Result<(), StoreError> {
        let now = self.clock.now();

        self.state
            .update(keys::RESPONSE_CACHE, |cache: &mut CacheMap| {
                let entry = cache
                    .entry(fingerprint.to_string())
                    .or_insert_with(|| CacheEntry::new(now));

                if !entry.responses.iter().any(|r| r == response) {
                    entry.responses.push(response.to_string());
                }
                let overflow = entry.responses.len().saturating_sub(self.config.max_variants);
                entry.responses.drain(..overflow);
                entry.timestamp = now;

                self.evict(cache, now);
            })
            .await
    }

    /// Entry and response counts, ignoring expired entries.
    pub async fn stats(&self) -> Result<CacheStats, StoreError> {
        let now = self.clock.now();
        let cache: CacheMap = self.state.read(keys::RESPONSE_CACHE).await?;

        Ok(cache
            .values()
            .filter(|entry| !self.is_expired(entry, now))
            .fold(CacheStats::default(), |mut stats, entry| {
                stats.entries += 1;
                stats.responses += entry.responses.len();
                stats
            }))
    }

    /// Drop every cached response.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.state.reset(keys::RESPONSE_CACHE).await
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        let ttl = chrono::Duration::from_std(self.config.ttl())
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        now - entry.timestamp > ttl
    }

    /// Purge expired entries, then keep the most recently written ones.
    fn evict(&self, cache: &mut CacheMap, now: DateTime<Utc>) {
        cache.retain(|_, entry| !self.is_expired(entry, now));

        if cache.len() > self.config.max_entries {
            let mut by_age: Vec<(DateTime<Utc>, String)> = cache
                .iter()
                .map(|(key, entry)| (entry.timestamp, key.clone()))
                .collect();
            by_age.sort();

            let excess = cache.len() - self.config.max_entries;
            for (_, key) in by_age.into_iter().take(excess) {
                cache.remove(&key);
            }
            debug!("Evicted {} cache entries", excess);
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
