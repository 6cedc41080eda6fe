//! User settings consumed per request.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StyleProfile;

/// Provider selection and sampling parameters chosen by the user.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default, alias = "api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens", alias = "max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Overrides the stored profile when present.
    #[serde(default, alias = "style_profile", skip_serializing_if = "Option::is_none")]
    pub style_profile: Option<StyleProfile>,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            style_profile: None,
        }
    }
}

impl Settings {
    /// API key with surrounding whitespace removed; `None` when blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("style_profile", &self.style_profile)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_on_first_read() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 150);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_settings_accepts_snake_case_aliases() {
        let json = r#"{"provider": "anthropic", "api_key": "k", "max_tokens": 80}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.api_key(), Some("k"));
        assert_eq!(settings.max_tokens, 80);
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let settings = Settings {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(settings.api_key().is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings {
            api_key: Some("sk-live-123".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-live-123"));
    }
}
