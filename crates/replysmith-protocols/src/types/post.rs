//! Scraped post types handed in by the page layer.

use serde::{Deserialize, Serialize};

/// Author of a feed post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub name: String,

    /// Profile headline, e.g. "Founder at Acme". Used for seniority cues.
    #[serde(default)]
    pub headline: String,
}

impl Author {
    pub fn new(name: impl Into<String>, headline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headline: headline.into(),
        }
    }
}

/// A named tone/goal preset ("celebrate", "ask a question", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vibe {
    pub label: String,
    /// Extra instruction merged into the generation prompt.
    pub prompt: String,
}

/// A request to draft a reply to one post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Post text as scraped.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author: Author,

    /// Whether the post carries an image or video.
    #[serde(default)]
    pub has_media: bool,

    /// When the request was issued, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp_ms: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<Vibe>,
}

impl GenerateRequest {
    pub fn new(content: impl Into<String>, author: Author) -> Self {
        Self {
            content: content.into(),
            author,
            ..Default::default()
        }
    }

    pub fn with_vibe(mut self, label: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.vibe = Some(Vibe {
            label: label.into(),
            prompt: prompt.into(),
        });
        self
    }

    pub fn with_media(mut self, has_media: bool) -> Self {
        self.has_media = has_media;
        self
    }
}
