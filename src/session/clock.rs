//! Wall-clock access for expiry checks
//!
//! The clock read is the only external input of the pipeline, so it sits
//! behind a trait to keep validation deterministic under test.

use chrono::Utc;

/// Source of the current time in whole seconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}
