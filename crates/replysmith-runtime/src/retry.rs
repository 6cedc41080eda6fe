//! Provider retry and error handling.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use replysmith_config::RetrySettings;
use replysmith_protocols::error::{ProviderError, ProviderErrorKind};
use replysmith_protocols::provider::{CompletionRequest, LLMProvider};
use replysmith_protocols::Clock;

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    /// Base delay between retries.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Exponential backoff multiplier.
    pub backoff_multiplier: f64,
    /// Wait after a 429 that carried no Retry-After.
    pub rate_limit_fallback: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            rate_limit_fallback: Duration::from_secs(10),
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_multiplier: settings.backoff_multiplier,
            rate_limit_fallback: Duration::from_secs(settings.rate_limit_fallback_secs),
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = delay.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(delay as u64)
    }

    /// How long to wait after `error` before retry number `attempt`.
    pub fn delay_for_error(&self, error: &ProviderError, attempt: u32) -> Duration {
        match error.kind() {
            ProviderErrorKind::RateLimited => {
                error.retry_after().unwrap_or(self.rate_limit_fallback)
            }
            _ => self.delay_for_attempt(attempt),
        }
    }
}

/// Check if an error is retryable.
pub fn is_retryable(error: &ProviderError) -> bool {
    error.is_retryable()
}

/// Provider wrapper with retry capability.
pub struct RetryProvider {
    inner: Arc<dyn LLMProvider>,
    config: RetryConfig,
    clock: Arc<dyn Clock>,
}

impl RetryProvider {
    /// Create a new retry provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: RetryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: provider,
            config,
            clock,
        }
    }

    /// Execute with retry.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if !is_retryable(&e) || attempt >= max_attempts {
                        if attempt > 1 {
                            warn!("Provider {} giving up after {} attempts: {}", self.inner.id(), attempt, e);
                        }
                        return Err(e);
                    }

                    let delay = self.config.delay_for_error(&e, attempt - 1);
                    warn!(
                        "Provider error (attempt {}/{}): {}, retrying in {:?}",
                        attempt, max_attempts, e, delay
                    );
                    self.clock.sleep(delay).await;
                }
            }
        }
    }

    /// Get inner provider.
    pub fn inner(&self) -> &Arc<dyn LLMProvider> {
        &self.inner
    }
}

#[async_trait]
impl LLMProvider for RetryProvider {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn is_local(&self) -> bool {
        self.inner.is_local()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        debug!("Completing with retry: model={}", request.model);
        self.with_retry(|| {
            let req = request.clone();
            let provider = self.inner.clone();
            async move { provider.complete(req).await }
        })
        .await
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
