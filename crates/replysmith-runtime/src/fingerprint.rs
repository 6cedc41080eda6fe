//! Post fingerprinting.
//!
//! Two posts that share an author, a length bucket, a vibe and their top
//! keywords map to the same fingerprint. Near-duplicates (different
//! punctuation, emoji, casing, word order) collide on purpose so the
//! semantic cache can serve them.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use replysmith_protocols::{GenerateRequest, LengthBucket};

const MAX_KEYWORDS: usize = 5;
const AUTHOR_TOKEN_CHARS: usize = 20;
const HASH_HEX_CHARS: usize = 16;

pub const ANONYMOUS_AUTHOR: &str = "anonymous";
pub const NO_KEYWORDS: &str = "none";
pub const DEFAULT_VIBE: &str = "default";

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "above", "after", "again", "against", "also", "always", "another", "anyone",
        "because", "been", "before", "being", "below", "between", "both", "cannot", "could",
        "didnt", "does", "doesnt", "doing", "dont", "down", "during", "each", "even", "ever",
        "every", "from", "further", "have", "having", "here", "hers", "herself", "himself",
        "into", "isnt", "itself", "just", "know", "like", "made", "make", "many", "more", "most",
        "much", "must", "myself", "never", "only", "other", "ours", "ourselves", "over",
        "really", "same", "should", "since", "some", "still", "such", "than", "that", "thats",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "thing",
        "things", "think", "this", "those", "through", "today", "under", "until", "very",
        "want", "wasnt", "well", "were", "what", "when", "where", "which", "while", "whom",
        "will", "with", "wont", "would", "youre", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// The normalized parts a fingerprint is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFingerprint {
    pub author_token: String,
    /// Sorted, deduplicated, at most five.
    pub keywords: Vec<String>,
    pub length_bucket: LengthBucket,
    pub vibe: String,
}

impl PostFingerprint {
    pub fn from_request(request: &GenerateRequest) -> Self {
        let cleaned = clean_text(&request.content);
        let vibe = request
            .vibe
            .as_ref()
            .map(|v| v.label.trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| DEFAULT_VIBE.to_string());

        Self {
            author_token: author_token(&request.author.name),
            keywords: keywords_from_cleaned(&cleaned),
            length_bucket: LengthBucket::from_len(cleaned.chars().count()),
            vibe,
        }
    }

    /// `author|kw1,kw2|bucket|vibe`
    pub fn canonical(&self) -> String {
        let keywords = if self.keywords.is_empty() {
            NO_KEYWORDS.to_string()
        } else {
            self.keywords.join(",")
        };
        format!(
            "{}|{}|{}|{}",
            self.author_token,
            keywords,
            self.length_bucket.as_str(),
            self.vibe
        )
    }

    /// First 16 hex chars of the SHA-256 of the canonical form.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(HASH_HEX_CHARS);
        hex
    }
}

/// Cache key for a post.
pub fn fingerprint(request: &GenerateRequest) -> String {
    PostFingerprint::from_request(request).hash()
}

/// Top keywords of `text`, sorted alphabetically.
pub fn extract_keywords(text: &str) -> Vec<String> {
    keywords_from_cleaned(&clean_text(text))
}

/// Lowercase, drop everything that is not a letter, digit or whitespace,
/// collapse runs of whitespace.
fn clean_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn keywords_from_cleaned(cleaned: &str) -> Vec<String> {
    // word -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let candidates = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOPWORDS.contains(w))
        .map(stem);

    for (position, word) in candidates.enumerate() {
        counts
            .entry(word)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let mut keywords: Vec<String> = ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _, _)| word)
        .collect();
    keywords.sort();
    keywords
}

/// Strip one common inflection suffix.
fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len > 5 && word.ends_with("ing") {
        word[..word.len() - 3].to_string()
    } else if len > 4 && word.ends_with("ed") {
        word[..word.len() - 2].to_string()
    } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn author_token(name: &str) -> String {
    let token: String = name
        .trim()
        .to_lowercase()
        .chars()
        .take(AUTHOR_TOKEN_CHARS)
        .collect();
    if token.is_empty() {
        ANONYMOUS_AUTHOR.to_string()
    } else {
        token
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
