//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, is_known_provider, is_local_provider};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_settings(config, &mut result);
        Self::validate_cache(config, &mut result);
        Self::validate_gate(config, &mut result);
        Self::validate_retry(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_storage(config, &mut result);

        Ok(result)
    }

    fn validate_settings(config: &Config, result: &mut ValidationResult) {
        let settings = &config.settings;

        if !is_known_provider(&settings.provider) {
            result.add_error(ValidationError::new(
                "settings.provider",
                format!("Unknown provider '{}'", settings.provider),
            ));
        } else if !is_local_provider(&settings.provider) {
            let from_section = config
                .providers
                .get(&settings.provider)
                .and_then(|p| p.api_key.as_deref())
                .is_some_and(|k| !k.trim().is_empty());
            if settings.api_key().is_none() && !from_section {
                result.add_warning(ValidationWarning::new(
                    "settings.api_key",
                    format!(
                        "No API key set for '{}', requests will fail until one is configured",
                        settings.provider
                    ),
                ));
            }
        }

        if settings.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "settings.model",
                "Model cannot be empty",
            ));
        }

        if settings.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "settings.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&settings.temperature) {
            result.add_error(ValidationError::new(
                "settings.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }
    }

    fn validate_cache(config: &Config, result: &mut ValidationResult) {
        let cache = &config.cache;

        if cache.ttl_seconds == 0 {
            result.add_error(ValidationError::new(
                "cache.ttl_seconds",
                "ttl_seconds must be greater than 0",
            ));
        }

        if cache.max_entries == 0 {
            result.add_error(ValidationError::new(
                "cache.max_entries",
                "max_entries must be greater than 0",
            ));
        }

        if cache.max_variants == 0 {
            result.add_error(ValidationError::new(
                "cache.max_variants",
                "max_variants must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&cache.variation_probability) {
            result.add_error(ValidationError::new(
                "cache.variation_probability",
                "variation_probability must be between 0.0 and 1.0",
            ));
        }
    }

    fn validate_gate(config: &Config, result: &mut ValidationResult) {
        let gate = &config.gate;

        if gate.max_per_hour == 0 {
            result.add_error(ValidationError::new(
                "gate.max_per_hour",
                "max_per_hour must be greater than 0",
            ));
        }

        if gate.window_seconds == 0 {
            result.add_error(ValidationError::new(
                "gate.window_seconds",
                "window_seconds must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&gate.similarity_threshold) {
            result.add_error(ValidationError::new(
                "gate.similarity_threshold",
                "similarity_threshold must be between 0.0 and 1.0",
            ));
        }

        if gate.history_limit < gate.similarity_window {
            result.add_warning(ValidationWarning::new(
                "gate.history_limit",
                "history_limit is smaller than similarity_window, older drafts will never be compared",
            ));
        }

        if gate.cooldown_seconds == 0 {
            result.add_warning(ValidationWarning::new(
                "gate.cooldown_seconds",
                "Cooldown is disabled",
            ));
        }
    }

    fn validate_retry(config: &Config, result: &mut ValidationResult) {
        let retry = &config.retry;

        if retry.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "retry.max_attempts",
                "max_attempts must be at least 1",
            ));
        }

        if retry.backoff_multiplier < 1.0 {
            result.add_error(ValidationError::new(
                "retry.backoff_multiplier",
                "backoff_multiplier must be at least 1.0",
            ));
        }

        if retry.base_delay_ms > retry.max_delay_ms {
            result.add_warning(ValidationWarning::new(
                "retry.base_delay_ms",
                "base_delay_ms exceeds max_delay_ms, every retry will wait max_delay_ms",
            ));
        }

        if retry.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "retry.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if !is_known_provider(name) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}", name),
                    format!("Section for unknown provider '{}' is ignored", name),
                ));
            }

            if let Some(ref url) = provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }

        if config.settings.provider == "local-process" && config.local.command.is_none() {
            result.add_error(ValidationError::new(
                "local.command",
                "local-process provider requires local.command",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        let valid_backends = ["file", "memory"];
        if !valid_backends.contains(&config.storage.backend.as_str()) {
            result.add_error(ValidationError::new(
                "storage.backend",
                format!(
                    "Unknown storage backend '{}', valid values: {:?}",
                    config.storage.backend, valid_backends
                ),
            ));
        }

        if config.storage.backend == "memory" {
            result.add_warning(ValidationWarning::new(
                "storage.backend",
                "Memory backend loses rate limit history and cache on exit",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
