//! Stage-1 post analysis.

use serde::{Deserialize, Deserializer, Serialize};

/// Risk of replying publicly to a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse loosely; anything unrecognized is `Low`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "medium" | "moderate" => RiskLevel::Medium,
            "high" | "severe" => RiskLevel::High,
            _ => RiskLevel::Low,
        }
    }
}

/// What the model made of the post. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub focal_point: String,

    #[serde(default)]
    pub author_intent: String,

    #[serde(default = "default_tone")]
    pub recommended_tone: String,

    #[serde(default, deserialize_with = "lenient_topics")]
    pub key_topics: Vec<String>,

    #[serde(default, deserialize_with = "lenient_risk")]
    pub risk_level: RiskLevel,
}

fn default_tone() -> String {
    "neutral".to_string()
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            focal_point: String::new(),
            author_intent: String::new(),
            recommended_tone: default_tone(),
            key_topics: Vec::new(),
            risk_level: RiskLevel::Low,
        }
    }
}

fn lenient_risk<'de, D>(deserializer: D) -> Result<RiskLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .map(RiskLevel::parse_lenient)
        .unwrap_or_default())
}

// Models sometimes answer "keyTopics": "funding, hiring".
fn lenient_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}
