//! HTTP execution of remote provider requests.
//!
//! A [`ProviderAdapter`] only shapes requests and responses. The
//! [`HttpProviderClient`] sends them, applies the request timeout and maps
//! transport failures onto [`ProviderError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use tracing::debug;

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{CompletionRequest, LLMProvider, ProviderAdapter};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `LLMProvider` backed by a remote HTTP API.
pub struct HttpProviderClient {
    adapter: Arc<dyn ProviderAdapter>,
    client: Client,
    timeout: Duration,
}

impl HttpProviderClient {
    pub fn new(adapter: Arc<dyn ProviderAdapter>) -> Result<Self, ProviderError> {
        Self::with_timeout(adapter, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        adapter: Arc<dyn ProviderAdapter>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            adapter,
            client,
            timeout,
        })
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    fn map_send_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

/// Parse a `Retry-After` header given in seconds.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[async_trait]
impl LLMProvider for HttpProviderClient {
    fn id(&self) -> &str {
        self.adapter.id()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let api_key = request.api_key.trim();
        if api_key.is_empty() {
            return Err(ProviderError::AuthenticationFailed(format!(
                "No API key configured for {}",
                self.adapter.id()
            )));
        }

        let url = self.adapter.endpoint(&request.model, api_key);
        let body = self.adapter.build_body(&request)?;

        let mut builder = self.client.post(&url).json(&body);
        for (name, value) in self.adapter.headers(api_key) {
            builder = builder.header(name, value);
        }

        debug!("Sending request to {}: model={}", self.adapter.id(), request.model);
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let text = response.text().await.unwrap_or_default();
            return Err(self
                .adapter
                .classify_error(status.as_u16(), &text, retry_after));
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("body is not JSON: {}", e)))?;

        self.adapter.parse_response(json)
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
