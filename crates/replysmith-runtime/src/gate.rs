//! Admission gate: rate limiting and repetition detection.
//!
//! Blocking checks (hourly limit, cooldown, similarity to recent drafts)
//! reject a request; pattern checks only produce warnings.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use replysmith_config::GateConfig;
use replysmith_protocols::store::keys;
use replysmith_protocols::{Clock, RateLimitStatus, StoreError};

use crate::state::PipelineState;

const OPENING_WORDS: usize = 3;
const OPENING_WINDOW: usize = 10;
const OPENING_REPEATS: usize = 2;
const PATTERN_WINDOW: usize = 5;
const LENGTH_TOLERANCE: f64 = 0.1;
const EMOJI_REPEATS: usize = 2;

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockReason {
    #[error("Hourly limit reached. Try again in {minutes} minute(s)")]
    HourlyLimit { minutes: u64 },

    #[error("Too soon. Wait {seconds} second(s) before drafting another comment")]
    Cooldown { seconds: u64 },

    #[error("Too similar to a recent comment ({percent}% match)")]
    TooSimilar { percent: u32 },
}

/// Where the first emoji sits in a comment, by word-index thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiPosition {
    Start,
    Middle,
    End,
}

impl fmt::Display for EmojiPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmojiPosition::Start => "start",
            EmojiPosition::Middle => "middle",
            EmojiPosition::End => "end",
        };
        f.write_str(s)
    }
}

/// Advisory repetition signals.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternWarning {
    RepeatedOpening { opening: String, count: usize },
    UniformLength { length: usize, mean: f64 },
    RepeatedEmojiPlacement { position: EmojiPosition, count: usize },
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternWarning::RepeatedOpening { opening, count } => write!(
                f,
                "Opening \"{}\" was already used {} times recently",
                opening, count
            ),
            PatternWarning::UniformLength { length, mean } => write!(
                f,
                "Length {} is close to your recent average of {:.0} characters",
                length, mean
            ),
            PatternWarning::RepeatedEmojiPlacement { position, count } => write!(
                f,
                "Emoji at the {} again ({} of your last {} comments)",
                position, count, PATTERN_WINDOW
            ),
        }
    }
}

/// A delivered comment, newest first in the persisted list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

pub struct AdmissionGate {
    state: Arc<PipelineState>,
    clock: Arc<dyn Clock>,
    config: GateConfig,
}

impl AdmissionGate {
    pub fn new(state: Arc<PipelineState>, clock: Arc<dyn Clock>, config: GateConfig) -> Self {
        Self {
            state,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Current rate-limit status.
    pub async fn status(&self) -> Result<RateLimitStatus, StoreError> {
        let timestamps: Vec<DateTime<Utc>> =
            self.state.read(keys::RATE_LIMIT_TIMESTAMPS).await?;
        Ok(self.evaluate(&timestamps, self.clock.now()).0)
    }

    /// Run the rate and cooldown checks.
    pub async fn check(&self) -> Result<Result<RateLimitStatus, BlockReason>, StoreError> {
        let timestamps: Vec<DateTime<Utc>> =
            self.state.read(keys::RATE_LIMIT_TIMESTAMPS).await?;
        let (status, blocked) = self.evaluate(&timestamps, self.clock.now());
        Ok(match blocked {
            Some(reason) => {
                info!("Admission blocked: {}", reason);
                Err(reason)
            }
            None => Ok(status),
        })
    }

    /// Compare a candidate against recent history.
    pub async fn check_similarity(&self, candidate: &str) -> Result<Option<BlockReason>, StoreError> {
        let history: Vec<HistoryEntry> = self.state.read(keys::COMMENT_HISTORY).await?;
        let candidate_words = word_set(candidate);

        let best = history
            .iter()
            .take(self.config.similarity_window)
            .map(|entry| jaccard(&candidate_words, &word_set(&entry.text)))
            .fold(0.0_f64, f64::max);

        if best >= self.config.similarity_threshold {
            let percent = (best * 100.0).round() as u32;
            info!("Draft rejected as {}% similar to a recent comment", percent);
            return Ok(Some(BlockReason::TooSimilar { percent }));
        }
        Ok(None)
    }

    /// Advisory checks against recent history.
    pub async fn detect_patterns(&self, candidate: &str) -> Result<Vec<PatternWarning>, StoreError> {
        let history: Vec<HistoryEntry> = self.state.read(keys::COMMENT_HISTORY).await?;
        Ok(detect_patterns(candidate, &history))
    }

    /// Record a delivered comment. Returns the status after recording,
    /// without a `reason`: a cooldown started by this comment is not a
    /// rejection of it.
    pub async fn record(&self, text: &str) -> Result<RateLimitStatus, StoreError> {
        let now = self.clock.now();
        let window = self.window();

        let timestamps = self
            .state
            .update(keys::RATE_LIMIT_TIMESTAMPS, |ts: &mut Vec<DateTime<Utc>>| {
                ts.retain(|t| now - *t < window);
                ts.push(now);
                ts.clone()
            })
            .await?;

        let limit = self.config.history_limit;
        self.state
            .update(keys::COMMENT_HISTORY, |history: &mut Vec<HistoryEntry>| {
                history.insert(
                    0,
                    HistoryEntry {
                        text: text.to_string(),
                        timestamp: now,
                    },
                );
                history.truncate(limit);
            })
            .await?;

        let mut status = self.evaluate(&timestamps, now).0;
        status.reason = None;
        debug!("Recorded generation, {} remaining this hour", status.remaining);
        Ok(status)
    }

    /// Most recent comments, newest first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.state.read(keys::COMMENT_HISTORY).await
    }

    fn window(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.config.window())
            .unwrap_or_else(|_| chrono::Duration::hours(1))
    }

    fn evaluate(
        &self,
        timestamps: &[DateTime<Utc>],
        now: DateTime<Utc>,
    ) -> (RateLimitStatus, Option<BlockReason>) {
        let window = self.window();
        let in_window: Vec<DateTime<Utc>> = timestamps
            .iter()
            .copied()
            .filter(|t| now - *t < window)
            .collect();

        let count = in_window.len() as u32;
        let remaining = self.config.max_per_hour.saturating_sub(count);

        let reset_in_minutes = in_window
            .iter()
            .min()
            .map(|oldest| ceil_div((*oldest + window - now).num_seconds(), 60));

        let cooldown = chrono::Duration::from_std(self.config.cooldown())
            .unwrap_or_else(|_| chrono::Duration::zero());
        let wait_seconds = in_window
            .iter()
            .max()
            .map(|latest| cooldown - (now - *latest))
            .filter(|left| *left > chrono::Duration::zero())
            .map(|left| ceil_div(left.num_milliseconds(), 1000));

        let blocked = if count >= self.config.max_per_hour {
            Some(BlockReason::HourlyLimit {
                minutes: reset_in_minutes.unwrap_or(1).max(1),
            })
        } else {
            wait_seconds.map(|seconds| BlockReason::Cooldown { seconds })
        };

        let status = RateLimitStatus {
            allowed: blocked.is_none(),
            remaining,
            reset_in_minutes,
            wait_seconds,
            reason: blocked.as_ref().map(ToString::to_string),
        };
        (status, blocked)
    }
}

fn ceil_div(value: i64, divisor: i64) -> u64 {
    if value <= 0 {
        0
    } else {
        ((value + divisor - 1) / divisor) as u64
    }
}

/// Lowercased words with surrounding punctuation removed.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Jaccard index of two word sets; 0.0 when both are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn detect_patterns(candidate: &str, history: &[HistoryEntry]) -> Vec<PatternWarning> {
    let mut warnings = Vec::new();

    if let Some(lead) = opening(candidate) {
        let count = history
            .iter()
            .take(OPENING_WINDOW)
            .filter(|entry| opening(&entry.text).as_deref() == Some(lead.as_str()))
            .count();
        if count >= OPENING_REPEATS {
            warnings.push(PatternWarning::RepeatedOpening {
                opening: lead,
                count,
            });
        }
    }

    let recent: Vec<&HistoryEntry> = history.iter().take(PATTERN_WINDOW).collect();
    if recent.len() == PATTERN_WINDOW {
        let mean = recent
            .iter()
            .map(|entry| entry.text.chars().count() as f64)
            .sum::<f64>()
            / PATTERN_WINDOW as f64;
        let length = candidate.chars().count();
        if mean > 0.0 && (length as f64 - mean).abs() <= mean * LENGTH_TOLERANCE {
            warnings.push(PatternWarning::UniformLength { length, mean });
        }
    }

    if let Some(position) = emoji_position(candidate) {
        let count = recent
            .iter()
            .filter(|entry| emoji_position(&entry.text) == Some(position))
            .count();
        if count >= EMOJI_REPEATS {
            warnings.push(PatternWarning::RepeatedEmojiPlacement { position, count });
        }
    }

    if !warnings.is_empty() {
        debug!("Pattern warnings: {:?}", warnings);
    }
    warnings
}

/// First three words, lowercased. `None` for shorter texts.
fn opening(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .take(OPENING_WORDS)
        .collect();
    (words.len() == OPENING_WORDS).then(|| words.join(" "))
}

fn emoji_position(text: &str) -> Option<EmojiPosition> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let index = words.iter().position(|w| w.chars().any(is_emoji))?;
    Some(match index * 3 / words.len() {
        0 => EmojiPosition::Start,
        1 => EmojiPosition::Middle,
        _ => EmojiPosition::End,
    })
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x1F1E6..=0x1F1FF | 0x2B50 | 0x2B55
    )
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
