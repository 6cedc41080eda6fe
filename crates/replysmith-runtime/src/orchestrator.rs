//! Two-stage comment generation.
//!
//! A request passes the admission gate, is served from the semantic cache
//! when possible, and otherwise goes through an analysis call followed by a
//! generation call. Successful drafts are checked for similarity, written
//! to the cache and recorded by the gate before they are returned.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use replysmith_config::Config;
use replysmith_protocols::{
    Analysis, Clock, CompletionRequest, GenerateRequest, GenerateResult, LLMProvider,
    ProviderError, Settings,
};

use crate::cache::SemanticCache;
use crate::error::PipelineError;
use crate::fingerprint::fingerprint;
use crate::gate::AdmissionGate;
use crate::prompts::{self, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE};
use crate::registry::ProviderRegistry;
use crate::retry::{RetryConfig, RetryProvider};
use crate::state::PipelineState;
use crate::style::StyleProfileStore;

/// Lifecycle of one generate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Admitted,
    Blocked,
    CacheHit,
    Analyzing,
    Analyzed,
    Generating,
    Succeeded,
    Failed,
    Recorded,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestPhase::Idle => "idle",
            RequestPhase::Admitted => "admitted",
            RequestPhase::Blocked => "blocked",
            RequestPhase::CacheHit => "cache_hit",
            RequestPhase::Analyzing => "analyzing",
            RequestPhase::Analyzed => "analyzed",
            RequestPhase::Generating => "generating",
            RequestPhase::Succeeded => "succeeded",
            RequestPhase::Failed => "failed",
            RequestPhase::Recorded => "recorded",
        };
        f.write_str(s)
    }
}

fn transition(fingerprint: &str, phase: RequestPhase) {
    debug!(fingerprint = %fingerprint, phase = %phase, "Request phase");
}

/// Drives a request from admission to a recorded comment.
pub struct CommentOrchestrator {
    registry: Arc<ProviderRegistry>,
    cache: SemanticCache,
    gate: AdmissionGate,
    styles: StyleProfileStore,
    clock: Arc<dyn Clock>,
    retry: RetryConfig,
}

impl CommentOrchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        state: Arc<PipelineState>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            cache: SemanticCache::new(state.clone(), clock.clone(), config.cache.clone()),
            gate: AdmissionGate::new(state.clone(), clock.clone(), config.gate.clone()),
            styles: StyleProfileStore::new(state),
            clock,
            retry: RetryConfig::from(&config.retry),
        }
    }

    /// Seed the cache's sampling and variation.
    pub fn with_cache_seed(mut self, seed: u64) -> Self {
        self.cache = self.cache.with_seed(seed);
        self
    }

    pub fn cache(&self) -> &SemanticCache {
        &self.cache
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn styles(&self) -> &StyleProfileStore {
        &self.styles
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Draft a reply to `request`.
    pub async fn generate(&self, request: &GenerateRequest, settings: &Settings) -> GenerateResult {
        self.generate_with_cancel(request, settings, &CancellationToken::new())
            .await
    }

    /// Like [`generate`](Self::generate); once `cancel` fires, a late result
    /// is discarded without touching the cache or the rate limiter.
    pub async fn generate_with_cancel(
        &self,
        request: &GenerateRequest,
        settings: &Settings,
        cancel: &CancellationToken,
    ) -> GenerateResult {
        let key = fingerprint(request);
        transition(&key, RequestPhase::Idle);

        match self.run(&key, request, settings, cancel).await {
            Ok(result) => result,
            Err(e) => {
                match &e {
                    PipelineError::AdmissionBlocked(reason) => {
                        transition(&key, RequestPhase::Blocked);
                        info!("Generation blocked: {}", reason);
                    }
                    PipelineError::Superseded => {
                        transition(&key, RequestPhase::Failed);
                        info!("Discarding superseded request {}", key);
                    }
                    _ => {
                        transition(&key, RequestPhase::Failed);
                        warn!("Generation failed: {}", e);
                    }
                }
                GenerateResult::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        key: &str,
        request: &GenerateRequest,
        settings: &Settings,
        cancel: &CancellationToken,
    ) -> Result<GenerateResult, PipelineError> {
        self.gate.check().await??;
        transition(key, RequestPhase::Admitted);

        if let Some(comment) = self.cache.get(key).await? {
            transition(key, RequestPhase::CacheHit);
            info!("Serving cached reply for {}", key);
            let status = self.gate.status().await?;
            return Ok(
                GenerateResult::success(comment, prompts::default_analysis(request), status)
                    .cached(),
            );
        }

        let provider = self.provider_for(settings)?;
        let api_key = if provider.is_local() {
            String::new()
        } else {
            settings
                .api_key()
                .ok_or_else(|| {
                    PipelineError::Config(format!(
                        "No API key configured for provider '{}'",
                        settings.provider
                    ))
                })?
                .to_string()
        };

        transition(key, RequestPhase::Analyzing);
        let analysis = self.analyze(&provider, request, settings, &api_key).await?;
        transition(key, RequestPhase::Analyzed);

        transition(key, RequestPhase::Generating);
        let comment = self
            .draft(&provider, request, settings, &api_key, &analysis)
            .await?;
        transition(key, RequestPhase::Succeeded);

        if cancel.is_cancelled() {
            return Err(PipelineError::Superseded);
        }

        if let Some(reason) = self.gate.check_similarity(&comment).await? {
            return Err(reason.into());
        }
        let warnings: Vec<String> = self
            .gate
            .detect_patterns(&comment)
            .await?
            .iter()
            .map(ToString::to_string)
            .collect();

        self.cache.set(key, &comment).await?;
        let status = self.gate.record(&comment).await?;
        transition(key, RequestPhase::Recorded);
        info!(
            "Generated reply via {} ({} remaining this hour)",
            settings.provider, status.remaining
        );

        Ok(GenerateResult::success(comment, analysis, status).with_warnings(warnings))
    }

    fn provider_for(&self, settings: &Settings) -> Result<RetryProvider, PipelineError> {
        let inner = self.registry.resolve(&settings.provider)?;
        Ok(RetryProvider::new(inner, self.retry.clone(), self.clock.clone()))
    }

    async fn analyze(
        &self,
        provider: &RetryProvider,
        request: &GenerateRequest,
        settings: &Settings,
        api_key: &str,
    ) -> Result<Analysis, PipelineError> {
        let completion = CompletionRequest::new(&settings.model, prompts::analysis_messages(request))
            .with_max_tokens(ANALYSIS_MAX_TOKENS)
            .with_temperature(ANALYSIS_TEMPERATURE)
            .with_api_key(api_key);

        match provider.complete(completion).await {
            Ok(raw) => Ok(prompts::parse_analysis(&raw).unwrap_or_else(|| {
                warn!("Analysis was not usable JSON, using defaults");
                prompts::default_analysis(request)
            })),
            Err(ProviderError::InvalidResponse(msg)) => {
                warn!("Analysis response had an unexpected shape ({}), using defaults", msg);
                Ok(prompts::default_analysis(request))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn draft(
        &self,
        provider: &RetryProvider,
        request: &GenerateRequest,
        settings: &Settings,
        api_key: &str,
        analysis: &Analysis,
    ) -> Result<String, PipelineError> {
        let style = self.styles.resolve(settings).await?;
        let messages =
            prompts::generation_messages(request, analysis, &style, settings.max_tokens);
        let completion = CompletionRequest::new(&settings.model, messages)
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature)
            .with_api_key(api_key);

        let comment = prompts::normalize_output(&provider.complete(completion).await?);
        if comment.is_empty() {
            return Err(ProviderError::InvalidResponse("empty completion".to_string()).into());
        }
        Ok(comment)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
