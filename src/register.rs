//! Provider registration and pipeline wiring for replysmith.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use replysmith_config::{Config, ConfigLoader, REMOTE_PROVIDERS};
use replysmith_local_inference::{LocalProvider, ProcessBackend, WorkerBridge};
use replysmith_protocols::{ProviderAdapter, Settings, StateStore};
use replysmith_provider_anthropic::AnthropicAdapter;
use replysmith_provider_gemini::GeminiAdapter;
use replysmith_provider_openai::OpenAIAdapter;
use replysmith_provider_openrouter::OpenRouterAdapter;
use replysmith_runtime::{
    CommentOrchestrator, FileStateStore, HttpProviderClient, MemoryStateStore, PipelineState,
    ProviderRegistry, SettingsStore, SystemClock,
};

/// Everything a command needs.
pub(crate) struct AppContext {
    pub config: Config,
    pub orchestrator: CommentOrchestrator,
    pub settings: SettingsStore,
}

impl AppContext {
    pub(crate) fn build(config: Config) -> anyhow::Result<Self> {
        let registry = Arc::new(build_registry(&config)?);
        let state = Arc::new(PipelineState::new(build_store(&config)?));
        let orchestrator =
            CommentOrchestrator::new(registry, state.clone(), Arc::new(SystemClock), &config);
        Ok(Self {
            config,
            orchestrator,
            settings: SettingsStore::new(state),
        })
    }

    /// Settings for this run: stored settings over the config file.
    pub(crate) async fn effective_settings(&self) -> anyhow::Result<Settings> {
        let base = configured_settings(&self.config);
        let mut settings = self.settings.resolve(&base).await?;
        if settings.api_key().is_none() {
            settings.api_key = provider_api_key(&self.config, &settings.provider);
        }
        Ok(settings)
    }
}

/// `[settings]` with the key from `[providers.<id>]` when none is set.
pub(crate) fn configured_settings(config: &Config) -> Settings {
    let mut settings = config.settings.clone();
    if settings.api_key().is_none() {
        settings.api_key = provider_api_key(config, &settings.provider);
    }
    settings
}

fn provider_api_key(config: &Config, provider: &str) -> Option<String> {
    config
        .providers
        .get(provider)
        .and_then(|p| p.api_key.clone())
        .filter(|k| !k.trim().is_empty())
}

/// Model used when a run switches to `provider` without naming one.
fn provider_default_model(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("gpt-4o-mini"),
        "anthropic" => Some("claude-3-5-haiku-latest"),
        "gemini" => Some("gemini-1.5-flash"),
        "openrouter" => Some("openai/gpt-4o-mini"),
        _ => None,
    }
}

/// Point `settings` at `provider`. The key and model never carry over from
/// a different provider.
pub(crate) fn switch_provider(config: &Config, settings: &mut Settings, provider: &str) {
    if settings.provider == provider {
        return;
    }
    settings.provider = provider.to_string();
    settings.api_key = provider_api_key(config, provider);
    if let Some(model) = provider_default_model(provider) {
        settings.model = model.to_string();
    }
}

fn remote_adapter(id: &str, base_url: Option<&str>) -> Option<Arc<dyn ProviderAdapter>> {
    let adapter: Arc<dyn ProviderAdapter> = match (id, base_url) {
        ("openai", Some(url)) => Arc::new(OpenAIAdapter::with_url(url)),
        ("openai", None) => Arc::new(OpenAIAdapter::new()),
        ("anthropic", Some(url)) => Arc::new(AnthropicAdapter::with_url(url)),
        ("anthropic", None) => Arc::new(AnthropicAdapter::new()),
        ("gemini", Some(url)) => Arc::new(GeminiAdapter::with_base_url(url)),
        ("gemini", None) => Arc::new(GeminiAdapter::new()),
        ("openrouter", Some(url)) => Arc::new(OpenRouterAdapter::with_url(url)),
        ("openrouter", None) => Arc::new(OpenRouterAdapter::new()),
        _ => return None,
    };
    Some(adapter)
}

/// Register every remote provider, plus the local ones when a command is
/// configured. Must run inside the tokio runtime.
pub(crate) fn build_registry(config: &Config) -> anyhow::Result<ProviderRegistry> {
    let registry = ProviderRegistry::new();
    let timeout = Duration::from_secs(config.retry.request_timeout_secs);

    for id in REMOTE_PROVIDERS {
        let base_url = config.providers.get(*id).and_then(|p| p.base_url.as_deref());
        let Some(adapter) = remote_adapter(id, base_url) else {
            warn!("No adapter for provider '{}', skipping", id);
            continue;
        };
        let client = HttpProviderClient::with_timeout(adapter, timeout)
            .with_context(|| format!("failed to build HTTP client for {}", id))?;
        registry.register(Arc::new(client))?;
    }

    match &config.local.command {
        Some(command) => {
            let process = ProcessBackend::new(command.clone(), config.local.args.clone())
                .with_timeout(timeout);
            let worker = WorkerBridge::new(Box::new(process.clone()), config.local.worker_queue);

            registry.register(Arc::new(LocalProvider::on_current_runtime(Arc::new(process))?))?;
            registry.register(Arc::new(LocalProvider::on_current_runtime(Arc::new(worker))?))?;
        }
        None => {
            if config.settings.provider.starts_with("local-") {
                warn!("Provider '{}' needs [local].command", config.settings.provider);
            }
        }
    }

    info!("Registered providers: {:?}", registry.list_ids());
    Ok(registry)
}

pub(crate) fn build_store(config: &Config) -> anyhow::Result<Arc<dyn StateStore>> {
    match config.storage.backend.as_str() {
        "file" => {
            let dir = ConfigLoader::data_dir(config);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create state directory {}", dir.display()))?;
            info!("State directory: {}", dir.display());
            Ok(Arc::new(FileStateStore::new(dir)))
        }
        "memory" => Ok(Arc::new(MemoryStateStore::new())),
        other => bail!("Unknown storage backend: {}", other),
    }
}
