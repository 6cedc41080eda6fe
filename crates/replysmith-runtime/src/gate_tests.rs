use super::*;
use crate::clock::ManualClock;
use crate::memory_store::MemoryStateStore;
use chrono::TimeZone;
use std::time::Duration;

fn setup() -> (AdmissionGate, Arc<ManualClock>) {
    setup_with(GateConfig::default())
}

fn setup_with(config: GateConfig) -> (AdmissionGate, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    ));
    let state = Arc::new(PipelineState::new(Arc::new(MemoryStateStore::new())));
    (AdmissionGate::new(state, clock.clone(), config), clock)
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

#[tokio::test]
async fn test_fresh_status() {
    let (gate, _) = setup();
    let status = gate.status().await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.remaining, 10);
    assert!(status.reset_in_minutes.is_none());
    assert!(status.reason.is_none());
}

#[tokio::test]
async fn test_ten_admits_then_hourly_block() {
    let (gate, clock) = setup();

    for i in 0..10 {
        assert!(gate.check().await.unwrap().is_ok(), "admit {}", i);
        gate.record(&format!("distinct comment number {}", i)).await.unwrap();
        clock.advance(Duration::from_secs(31));
    }

    let status = gate.status().await.unwrap();
    assert!(!status.allowed);
    assert_eq!(status.remaining, 0);

    match gate.check().await.unwrap() {
        Err(BlockReason::HourlyLimit { minutes }) => assert_eq!(minutes, 55),
        other => panic!("expected hourly limit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hourly_window_slides() {
    let (gate, clock) = setup();
    for i in 0..10 {
        gate.record(&format!("comment {}", i)).await.unwrap();
        clock.advance(Duration::from_secs(60));
    }
    assert!(gate.check().await.unwrap().is_err());

    // the first record leaves the window one hour after it was made
    clock.advance(Duration::from_secs(3600 - 600 + 1));
    let status = gate.check().await.unwrap().unwrap();
    assert_eq!(status.remaining, 1);
}

#[tokio::test]
async fn test_cooldown_blocks_at_five_seconds() {
    let (gate, clock) = setup();
    gate.record("first comment").await.unwrap();

    clock.advance(Duration::from_secs(5));
    match gate.check().await.unwrap() {
        Err(BlockReason::Cooldown { seconds }) => assert_eq!(seconds, 25),
        other => panic!("expected cooldown, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cooldown_clears_after_thirty_one_seconds() {
    let (gate, clock) = setup();
    gate.record("first comment").await.unwrap();

    clock.advance(Duration::from_secs(31));
    let status = gate.check().await.unwrap().unwrap();
    assert!(status.allowed);
    assert_eq!(status.remaining, 9);
    assert!(status.wait_seconds.is_none());
}

#[tokio::test]
async fn test_record_returns_post_record_status() {
    let (gate, _) = setup();
    let status = gate.record("hello there friend").await.unwrap();
    assert_eq!(status.remaining, 9);
    assert_eq!(status.reset_in_minutes, Some(60));
    // cooldown just started
    assert!(!status.allowed);
    assert_eq!(status.wait_seconds, Some(30));
    assert!(status.reason.is_none());

    // a later check still names the cooldown
    let blocked = gate.status().await.unwrap();
    assert!(blocked.reason.is_some());
}

#[tokio::test]
async fn test_similarity_at_threshold_blocks() {
    let (gate, _) = setup();
    gate.record("alpha bravo charlie delta").await.unwrap();

    let blocked = gate
        .check_similarity("Alpha, bravo charlie echo!")
        .await
        .unwrap();
    assert_eq!(blocked, Some(BlockReason::TooSimilar { percent: 60 }));
}

#[tokio::test]
async fn test_similarity_below_threshold_passes() {
    let (gate, _) = setup();
    let shared = numbered("w", 10);
    let history = [shared.clone(), numbered("h", 3)].concat().join(" ");
    let candidate = [shared, numbered("c", 4)].concat().join(" ");
    gate.record(&history).await.unwrap();

    // 10 shared words out of 17 distinct: 0.588
    assert!(gate.check_similarity(&candidate).await.unwrap().is_none());
}

#[tokio::test]
async fn test_similarity_only_checks_recent_window() {
    let (gate, _) = setup();
    gate.record("the original comment text").await.unwrap();
    for i in 0..20 {
        gate.record(&numbered(&format!("x{}y", i), 4).join(" "))
            .await
            .unwrap();
    }

    assert!(gate
        .check_similarity("the original comment text")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_history_capped() {
    let (gate, _) = setup();
    for i in 0..105 {
        gate.record(&format!("comment {}", i)).await.unwrap();
    }
    let history = gate.history().await.unwrap();
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].text, "comment 104");
}

#[tokio::test]
async fn test_repeated_opening_warning() {
    let (gate, _) = setup();
    gate.record("Love this idea, tell me more").await.unwrap();
    gate.record("Love this idea. Shipping soon?").await.unwrap();

    let warnings = gate
        .detect_patterns("love this idea! Where do I sign up?")
        .await
        .unwrap();
    assert!(warnings.contains(&PatternWarning::RepeatedOpening {
        opening: "love this idea".to_string(),
        count: 2,
    }));
}

#[tokio::test]
async fn test_single_prior_opening_is_fine() {
    let (gate, _) = setup();
    gate.record("Love this idea, tell me more").await.unwrap();

    let warnings = gate.detect_patterns("Love this idea too").await.unwrap();
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn test_uniform_length_warning() {
    let (gate, _) = setup();
    for text in ["a".repeat(100), "b".repeat(98), "c".repeat(102), "d".repeat(100), "e".repeat(100)] {
        gate.record(&text).await.unwrap();
    }

    let warnings = gate.detect_patterns(&"z".repeat(105)).await.unwrap();
    assert!(warnings
        .iter()
        .any(|w| matches!(w, PatternWarning::UniformLength { length: 105, .. })));

    let warnings = gate.detect_patterns(&"z".repeat(40)).await.unwrap();
    assert!(!warnings
        .iter()
        .any(|w| matches!(w, PatternWarning::UniformLength { .. })));
}

#[tokio::test]
async fn test_uniform_length_needs_full_window() {
    let (gate, _) = setup();
    gate.record(&"a".repeat(100)).await.unwrap();
    let warnings = gate.detect_patterns(&"z".repeat(100)).await.unwrap();
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn test_emoji_placement_warning() {
    let (gate, _) = setup();
    gate.record("Huge news for the whole team 🎉").await.unwrap();
    gate.record("What a milestone for everyone involved 🚀").await.unwrap();

    let warnings = gate
        .detect_patterns("Congrats to all of you here 🙌")
        .await
        .unwrap();
    assert!(warnings.contains(&PatternWarning::RepeatedEmojiPlacement {
        position: EmojiPosition::End,
        count: 2,
    }));

    let warnings = gate
        .detect_patterns("🙌 Congrats to all of you here")
        .await
        .unwrap();
    assert!(!warnings
        .iter()
        .any(|w| matches!(w, PatternWarning::RepeatedEmojiPlacement { .. })));
}

#[test]
fn test_jaccard() {
    let a = word_set("Alpha bravo, charlie!");
    let b = word_set("alpha BRAVO delta");
    assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
    assert_eq!(jaccard(&word_set(""), &word_set("")), 0.0);
}

#[test]
fn test_block_reason_messages() {
    assert!(BlockReason::HourlyLimit { minutes: 12 }
        .to_string()
        .contains("12 minute"));
    assert!(BlockReason::Cooldown { seconds: 25 }
        .to_string()
        .contains("25 second"));
    assert!(BlockReason::TooSimilar { percent: 72 }
        .to_string()
        .contains("72%"));
}

#[test]
fn test_pattern_warning_display() {
    let warning = PatternWarning::RepeatedOpening {
        opening: "love this idea".to_string(),
        count: 2,
    };
    assert!(warning.to_string().contains("love this idea"));
}

#[tokio::test]
async fn test_custom_limits() {
    let (gate, clock) = setup_with(GateConfig {
        max_per_hour: 2,
        cooldown_seconds: 0,
        ..Default::default()
    });
    gate.record("one comment").await.unwrap();
    clock.advance(Duration::from_secs(1));
    gate.record("two comment").await.unwrap();

    assert!(matches!(
        gate.check().await.unwrap(),
        Err(BlockReason::HourlyLimit { .. })
    ));
}
