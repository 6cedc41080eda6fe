//! Time source abstraction.
//!
//! Everything in the pipeline that reads the current time or waits goes
//! through a [`Clock`], so rate windows, TTLs and retry backoff can be
//! driven by a fake clock in tests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current instant and of delays.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Wait for the given duration.
    async fn sleep(&self, duration: Duration);
}
