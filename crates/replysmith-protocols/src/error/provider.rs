//! LLM Provider errors.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited{}", .retry_after_seconds.map(|s| format!(": retry after {s} seconds")).unwrap_or_default())]
    RateLimited { retry_after_seconds: Option<u64> },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Local provider invoked from the wrong execution context: {0}")]
    WrongContext(String),

    #[error("Local inference failed: {0}")]
    LocalBackend(String),
}

/// Coarse classification used by the retry policy and for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// 401/403, never retried.
    Auth,
    /// 429, retried after the server-provided or fallback delay.
    RateLimited,
    /// Network failures and 5xx, retried with backoff.
    Transient,
    /// Response did not have the expected shape.
    Schema,
    /// The call exceeded its deadline.
    Timeout,
    /// A local backend must be re-dispatched from another context.
    WrongContext,
    /// Anything else; surfaced as-is.
    Fatal,
}

impl ProviderError {
    /// Map a non-success HTTP response to an error.
    pub fn from_api_response(status: u16, message: String, retry_after_seconds: Option<u64>) -> Self {
        match status {
            401 | 403 => ProviderError::AuthenticationFailed(message),
            429 => ProviderError::RateLimited { retry_after_seconds },
            _ => ProviderError::ApiError { status, message },
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::AuthenticationFailed(_) => ProviderErrorKind::Auth,
            ProviderError::RateLimited { .. } => ProviderErrorKind::RateLimited,
            ProviderError::Network(_) => ProviderErrorKind::Transient,
            ProviderError::ApiError { status, .. } if is_transient_status(*status) => {
                ProviderErrorKind::Transient
            }
            ProviderError::InvalidResponse(_) => ProviderErrorKind::Schema,
            ProviderError::Timeout(_) => ProviderErrorKind::Timeout,
            ProviderError::WrongContext(_) => ProviderErrorKind::WrongContext,
            _ => ProviderErrorKind::Fatal,
        }
    }

    /// Whether the retry loop may attempt the call again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ProviderErrorKind::RateLimited | ProviderErrorKind::Transient
        )
    }

    /// Server-requested delay before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited {
                retry_after_seconds: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 408 || (500..600).contains(&status)
}

/// Pull a human-readable message out of a provider error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; falls back to the raw body.
pub fn extract_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .or_else(|| v["message"].as_str())
        })
        .map(String::from)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
