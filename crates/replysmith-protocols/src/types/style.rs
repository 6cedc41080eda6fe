//! Learned writing-voice profile.

use serde::{Deserialize, Serialize};

/// Short/medium/long classification shared by post fingerprints and style profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    #[default]
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// Bucket a character count: short ≤ 100, medium ≤ 200, long otherwise.
    pub fn from_len(chars: usize) -> Self {
        if chars <= 100 {
            LengthBucket::Short
        } else if chars <= 200 {
            LengthBucket::Medium
        } else {
            LengthBucket::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthBucket::Short => "short",
            LengthBucket::Medium => "medium",
            LengthBucket::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiFrequency {
    #[default]
    None,
    Rare,
    Moderate,
    Frequent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    #[default]
    Standard,
    Lowercase,
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationStyle {
    Minimal,
    #[default]
    Standard,
    Expressive,
}

/// Descriptor of the user's voice, produced by an external learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    #[serde(default)]
    pub length: LengthBucket,

    #[serde(default)]
    pub emoji_frequency: EmojiFrequency,

    #[serde(default)]
    pub casing: Casing,

    #[serde(default)]
    pub punctuation_style: PunctuationStyle,

    #[serde(default)]
    pub common_phrases: Vec<String>,

    /// Free-form structure hint, e.g. "one short paragraph, ends with a question".
    #[serde(default)]
    pub structure: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bucket_boundaries() {
        assert_eq!(LengthBucket::from_len(0), LengthBucket::Short);
        assert_eq!(LengthBucket::from_len(100), LengthBucket::Short);
        assert_eq!(LengthBucket::from_len(101), LengthBucket::Medium);
        assert_eq!(LengthBucket::from_len(200), LengthBucket::Medium);
        assert_eq!(LengthBucket::from_len(201), LengthBucket::Long);
    }

    #[test]
    fn test_style_profile_from_learner_json() {
        let json = serde_json::json!({
            "length": "medium",
            "emojiFrequency": "rare",
            "casing": "lowercase",
            "punctuationStyle": "minimal",
            "commonPhrases": ["love this", "big if true"],
            "structure": "one line"
        });
        let profile: StyleProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.length, LengthBucket::Medium);
        assert_eq!(profile.emoji_frequency, EmojiFrequency::Rare);
        assert_eq!(profile.casing, Casing::Lowercase);
        assert_eq!(profile.common_phrases.len(), 2);
    }

    #[test]
    fn test_style_profile_defaults() {
        let profile: StyleProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, StyleProfile::default());
        assert_eq!(profile.punctuation_style, PunctuationStyle::Standard);
    }
}
