//! Textual variation of cached responses.

use rand::Rng;

const LEAD_INS: &[&str] = &["Honestly, ", "Really, ", "Genuinely, ", "Truly, "];

const TRAILING_THOUGHTS: &[&str] = &[
    "Curious to see where this goes.",
    "Looking forward to more on this.",
    "Well deserved.",
    "Exciting times ahead.",
];

const SYNONYMS: &[(&str, &str)] = &[
    ("great", "fantastic"),
    ("amazing", "incredible"),
    ("congrats", "congratulations"),
    ("interesting", "fascinating"),
    ("important", "crucial"),
    ("really", "truly"),
    ("big", "huge"),
    ("love", "appreciate"),
    ("helpful", "useful"),
    ("insightful", "thoughtful"),
];

/// Ways a stored response can be reworded before it is served again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationStrategy {
    /// Add or drop a short lead-in on the opening sentence.
    RewrapOpening,
    /// Append a closing thought, or remove one that is already there.
    TrailingThought,
    /// Swap one word for a synonym.
    SynonymSwap,
}

impl VariationStrategy {
    pub const ALL: [VariationStrategy; 3] = [
        VariationStrategy::RewrapOpening,
        VariationStrategy::TrailingThought,
        VariationStrategy::SynonymSwap,
    ];

    /// Apply the strategy. Returns `None` when it does not fit the text.
    pub fn apply<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Option<String> {
        let varied = match self {
            VariationStrategy::RewrapOpening => rewrap_opening(text, rng),
            VariationStrategy::TrailingThought => Some(trailing_thought(text, rng)),
            VariationStrategy::SynonymSwap => synonym_swap(text),
        }?;
        (varied != text).then_some(varied)
    }
}

/// Produce a variant of `text` that is guaranteed to differ from it.
pub fn vary<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let start = rng.random_range(0..VariationStrategy::ALL.len());
    for offset in 0..VariationStrategy::ALL.len() {
        let strategy = VariationStrategy::ALL[(start + offset) % VariationStrategy::ALL.len()];
        if let Some(varied) = strategy.apply(text, rng) {
            return varied;
        }
    }
    // TrailingThought always changes non-identical input; this only covers
    // pathological text that equals its own variant.
    format!("{} {}", text.trim_end(), TRAILING_THOUGHTS[0])
}

fn rewrap_opening<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<String> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(lead) = LEAD_INS.iter().find(|lead| trimmed.starts_with(**lead)) {
        let rest = &trimmed[lead.len()..];
        return Some(capitalize_first(rest));
    }

    let lead = LEAD_INS[rng.random_range(0..LEAD_INS.len())];
    Some(format!("{}{}", lead, lowercase_first(trimmed)))
}

fn trailing_thought<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let trimmed = text.trim_end();

    if let Some(thought) = TRAILING_THOUGHTS.iter().find(|t| trimmed.ends_with(**t)) {
        let rest = trimmed[..trimmed.len() - thought.len()].trim_end();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    let thought = TRAILING_THOUGHTS[rng.random_range(0..TRAILING_THOUGHTS.len())];
    if trimmed.is_empty() {
        thought.to_string()
    } else if trimmed.ends_with(['.', '!', '?']) {
        format!("{} {}", trimmed, thought)
    } else {
        format!("{}. {}", trimmed, thought)
    }
}

fn synonym_swap(text: &str) -> Option<String> {
    let mut words: Vec<String> = text.split(' ').map(str::to_string).collect();

    for word in words.iter_mut() {
        let Some(start) = word.find(|c: char| c.is_alphanumeric()) else {
            continue;
        };
        let end = word
            .rfind(|c: char| c.is_alphanumeric())
            .map(|i| i + 1)
            .unwrap_or(word.len());
        if start >= end {
            continue;
        }
        let core = &word[start..end];
        let lower = core.to_lowercase();

        let replacement = SYNONYMS.iter().find_map(|(a, b)| {
            if lower == *a {
                Some(*b)
            } else if lower == *b {
                Some(*a)
            } else {
                None
            }
        });

        if let Some(replacement) = replacement {
            let replacement = match_case(core, replacement);
            *word = format!("{}{}{}", &word[..start], replacement, &word[end..]);
            return Some(words.join(" "));
        }
    }

    None
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) && original.len() > 1 {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        // Keep "I", acronyms and proper-looking words intact.
        Some(first) if first.is_uppercase() => {
            let second = text.chars().nth(1);
            if second.is_none_or(|c| c.is_uppercase() || c.is_whitespace() || c == '\'') {
                text.to_string()
            } else {
                first.to_lowercase().chain(chars).collect()
            }
        }
        _ => text.to_string(),
    }
}
