//! Time source abstraction.
//!
//! Node timestamps and event timestamps come from an injected [`Clock`] so tests
//! can pin time and assert exact `created`/`modified` values.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Fixed clock at the given unix timestamp (seconds). Out-of-range
    /// seconds clamp to the epoch.
    pub fn at_unix(secs: i64) -> Self {
        FixedClock(DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared handle to a clock.
pub type SharedClock = Arc<dyn Clock>;
