//! Results returned to the page layer.

use serde::{Deserialize, Serialize};

use super::Analysis;

/// Snapshot of the rate limiter as seen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub allowed: bool,

    /// Generations still available in the trailing hour.
    pub remaining: u32,

    /// Minutes until the oldest generation leaves the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_in_minutes: Option<u64>,

    /// Seconds until the cooldown ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_seconds: Option<u64>,

    /// Human-readable reason when not allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of one generate call.
///
/// Serialized as `{success: true, comment, analysis, rateLimitStatus}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_status: Option<RateLimitStatus>,

    /// Advisory pattern warnings; never block delivery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResult {
    pub fn success(
        comment: impl Into<String>,
        analysis: Analysis,
        rate_limit_status: RateLimitStatus,
    ) -> Self {
        Self {
            success: true,
            comment: Some(comment.into()),
            analysis: Some(analysis),
            rate_limit_status: Some(rate_limit_status),
            warnings: Vec::new(),
            from_cache: false,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            comment: None,
            analysis: None,
            rate_limit_status: None,
            warnings: Vec::new(),
            from_cache: false,
            error: Some(error.into()),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn cached(mut self) -> Self {
        self.from_cache = true;
        self
    }
}
