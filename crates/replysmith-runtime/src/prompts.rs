//! Prompt construction and output cleanup for the two generation stages.

use std::fmt::Write;

use replysmith_protocols::{
    Analysis, Casing, ChatMessage, EmojiFrequency, GenerateRequest, PunctuationStyle, RiskLevel,
    StyleProfile,
};

use crate::fingerprint::extract_keywords;

/// Token budget for the analysis call.
pub const ANALYSIS_MAX_TOKENS: u32 = 200;
/// Temperature for the analysis call.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

const FOCAL_POINT_CHARS: usize = 100;

/// Openers and filler that read as machine-written.
pub const BANNED_PHRASES: &[&str] = &[
    "Great post",
    "Thanks for sharing",
    "I couldn't agree more",
    "This resonates",
    "Love this",
    "Spot on",
    "Absolutely",
    "Well said",
    "As an AI",
    "In today's fast-paced world",
    "Game changer",
    "Delve",
    "Navigating the landscape",
    "It's important to note",
];

/// Hard word cap for a token budget.
pub fn word_limit(max_tokens: u32) -> u32 {
    match max_tokens {
        0..=50 => 15,
        51..=100 => 30,
        101..=150 => 45,
        151..=300 => 60,
        _ => 80,
    }
}

/// Rough seniority read from a profile headline.
pub fn seniority(headline: &str) -> &'static str {
    let headline = headline.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| headline.contains(n));

    if has(&["founder", "ceo", "cto", "cfo", "coo", "chief", "president", "vp ", "vice president", "partner", "director", "head of"]) {
        "senior leader"
    } else if has(&["manager", "lead", "principal", "senior", "staff"]) {
        "experienced professional"
    } else if has(&["student", "intern", "junior", "aspiring", "graduate"]) {
        "early-career"
    } else {
        "professional"
    }
}

/// Stage 1 messages.
pub fn analysis_messages(request: &GenerateRequest) -> Vec<ChatMessage> {
    let system = "You analyze social media posts before someone replies to them. \
Respond with a single JSON object and nothing else, using exactly these keys: \
\"focalPoint\" (the one thing a reply should engage with), \
\"authorIntent\" (what the author wants, including how senior they seem), \
\"recommendedTone\" (one or two words), \
\"keyTopics\" (array of up to five short topics), \
\"riskLevel\" (\"low\", \"medium\" or \"high\" risk of a public reply going wrong).";

    let mut user = String::new();
    let _ = writeln!(user, "Author: {}", display_or(&request.author.name, "unknown"));
    let _ = writeln!(user, "Headline: {}", display_or(&request.author.headline, "none"));
    let _ = writeln!(user, "Seniority: {}", seniority(&request.author.headline));
    if request.has_media {
        let _ = writeln!(user, "The post includes an image or video.");
    }
    let _ = writeln!(user, "\nPost:\n{}", request.content.trim());

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Stage 2 messages.
pub fn generation_messages(
    request: &GenerateRequest,
    analysis: &Analysis,
    style: &StyleProfile,
    max_tokens: u32,
) -> Vec<ChatMessage> {
    let limit = word_limit(max_tokens);
    let mut system = String::from(
        "You write short replies to social media posts in the user's own voice. \
Reply with the comment text only: no quotes, no preamble, no hashtags.\n",
    );

    let _ = writeln!(system, "\nContext:");
    let _ = writeln!(system, "- Focus on: {}", analysis.focal_point);
    if !analysis.author_intent.is_empty() {
        let _ = writeln!(system, "- Author intent: {}", analysis.author_intent);
    }
    let _ = writeln!(system, "- Tone: {}", analysis.recommended_tone);
    if !analysis.key_topics.is_empty() {
        let _ = writeln!(system, "- Topics: {}", analysis.key_topics.join(", "));
    }
    if analysis.risk_level >= RiskLevel::Medium {
        let _ = writeln!(
            system,
            "- The post is sensitive ({} risk). Stay neutral and avoid taking sides.",
            risk_label(analysis.risk_level)
        );
    }

    let _ = writeln!(system, "\nVoice:");
    let _ = writeln!(system, "- Length: {}", style.length.as_str());
    let _ = writeln!(system, "- Emoji: {}", emoji_rule(style.emoji_frequency));
    let _ = writeln!(system, "- Casing: {}", casing_rule(style.casing));
    let _ = writeln!(system, "- Punctuation: {}", punctuation_rule(style.punctuation_style));
    if !style.common_phrases.is_empty() {
        let _ = writeln!(
            system,
            "- Phrases the user often uses (at most one, only if natural): {}",
            style.common_phrases.join("; ")
        );
    }
    if !style.structure.trim().is_empty() {
        let _ = writeln!(system, "- Structure: {}", style.structure.trim());
    }

    if let Some(vibe) = &request.vibe {
        if !vibe.prompt.trim().is_empty() {
            let _ = writeln!(system, "\nGoal: {}", vibe.prompt.trim());
        }
    }

    let _ = writeln!(system, "\nRules:");
    let _ = writeln!(system, "- Hard limit: {} words.", limit);
    let _ = writeln!(
        system,
        "- Never use these phrases or openers: {}.",
        BANNED_PHRASES.join(", ")
    );
    let _ = writeln!(system, "- Do not restate the post. Add something specific.");

    let user = format!(
        "Post by {}:\n{}",
        display_or(&request.author.name, "someone"),
        request.content.trim()
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Fallback analysis when the model's answer is unusable.
pub fn default_analysis(request: &GenerateRequest) -> Analysis {
    Analysis {
        focal_point: request
            .content
            .trim()
            .chars()
            .take(FOCAL_POINT_CHARS)
            .collect(),
        author_intent: format!("share an update ({})", seniority(&request.author.headline)),
        recommended_tone: "neutral".to_string(),
        key_topics: extract_keywords(&request.content),
        risk_level: RiskLevel::Low,
    }
}

/// Parse the stage-1 answer. `None` when it is not a usable JSON object.
pub fn parse_analysis(raw: &str) -> Option<Analysis> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    if !value.is_object() {
        return None;
    }
    let analysis: Analysis = serde_json::from_value(value).ok()?;
    if analysis.focal_point.trim().is_empty() {
        return None;
    }
    Some(analysis)
}

/// Trim and strip wrapping quotes, repeatedly.
pub fn normalize_output(raw: &str) -> String {
    const QUOTES: &[(char, char)] = &[
        ('"', '"'),
        ('\'', '\''),
        ('\u{201C}', '\u{201D}'),
        ('\u{2018}', '\u{2019}'),
        ('`', '`'),
    ];

    let mut text = raw.trim();
    loop {
        let stripped = QUOTES.iter().find_map(|(open, close)| {
            let inner = text.strip_prefix(*open)?.strip_suffix(*close)?;
            Some(inner.trim())
        });
        match stripped {
            Some(inner) if inner.len() < text.len() => text = inner,
            _ => break,
        }
    }
    text.to_string()
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "low",
        RiskLevel::Medium => "medium",
        RiskLevel::High => "high",
    }
}

fn emoji_rule(frequency: EmojiFrequency) -> &'static str {
    match frequency {
        EmojiFrequency::None => "none",
        EmojiFrequency::Rare => "at most one, usually none",
        EmojiFrequency::Moderate => "one is fine",
        EmojiFrequency::Frequent => "one or two",
    }
}

fn casing_rule(casing: Casing) -> &'static str {
    match casing {
        Casing::Standard => "normal sentence case",
        Casing::Lowercase => "all lowercase",
        Casing::Mixed => "casual, mixed casing is fine",
    }
}

fn punctuation_rule(style: PunctuationStyle) -> &'static str {
    match style {
        PunctuationStyle::Minimal => "minimal, skip the final period",
        PunctuationStyle::Standard => "standard",
        PunctuationStyle::Expressive => "expressive, exclamation marks are fine",
    }
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
