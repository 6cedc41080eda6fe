//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub use replysmith_protocols::types::Settings;

/// Provider IDs shipped with replysmith.
pub const REMOTE_PROVIDERS: &[&str] = &["openai", "anthropic", "gemini", "openrouter"];
pub const LOCAL_PROVIDERS: &[&str] = &["local-worker", "local-process"];

/// Whether `id` names a built-in provider.
pub fn is_known_provider(id: &str) -> bool {
    REMOTE_PROVIDERS.contains(&id) || LOCAL_PROVIDERS.contains(&id)
}

/// Whether `id` names an on-device provider that needs no API key.
pub fn is_local_provider(id: &str) -> bool {
    LOCAL_PROVIDERS.contains(&id)
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub local: LocalConfig,
}

/// Semantic cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Stored response variants per fingerprint.
    #[serde(default = "default_max_variants")]
    pub max_variants: usize,

    /// Chance that a cache hit is textually varied.
    #[serde(default = "default_variation_probability")]
    pub variation_probability: f64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
            max_variants: default_max_variants(),
            variation_probability: default_variation_probability(),
        }
    }
}

fn default_ttl_seconds() -> u64 {
    24 * 60 * 60
}

fn default_max_entries() -> usize {
    100
}

fn default_max_variants() -> usize {
    5
}

fn default_variation_probability() -> f64 {
    0.3
}

/// Admission gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_max_per_hour")]
    pub max_per_hour: u32,

    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,

    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Jaccard similarity at or above which a draft is rejected.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// History entries compared by the similarity check.
    #[serde(default = "default_similarity_window")]
    pub similarity_window: usize,

    /// History entries retained.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl GateConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_per_hour: default_max_per_hour(),
            window_seconds: default_window_seconds(),
            cooldown_seconds: default_cooldown_seconds(),
            similarity_threshold: default_similarity_threshold(),
            similarity_window: default_similarity_window(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_max_per_hour() -> u32 {
    10
}

fn default_window_seconds() -> u64 {
    60 * 60
}

fn default_cooldown_seconds() -> u64 {
    30
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_similarity_window() -> usize {
    20
}

fn default_history_limit() -> usize {
    100
}

/// Provider retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, first call included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Delay after a 429 that carried no Retry-After header.
    #[serde(default = "default_rate_limit_fallback_secs")]
    pub rate_limit_fallback_secs: u64,

    /// Per-call HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            rate_limit_fallback_secs: default_rate_limit_fallback_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_rate_limit_fallback_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Where pipeline state is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "file" or "memory".
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Defaults to `~/.replysmith/state`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: None,
        }
    }
}

fn default_storage_backend() -> String {
    "file".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write daily-rotated log files.
    #[serde(default = "default_true")]
    pub file: bool,

    /// Defaults to `~/.replysmith/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Per-provider overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Replaces the default endpoint URL (the API root for gemini).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Used when `settings.api_key` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// On-device execution paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Program run by the `local-process` provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Queue depth of the `local-worker` bridge.
    #[serde(default = "default_worker_queue")]
    pub worker_queue: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            worker_queue: default_worker_queue(),
        }
    }
}

fn default_worker_queue() -> usize {
    8
}
