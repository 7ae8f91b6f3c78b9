//! Fake implementations of the validator's injected seams

use std::sync::Mutex;

use crate::session::Clock;
use crate::utils::logging::{AuthFailure, AuthLogger};

/// Clock frozen at a Unix timestamp
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Clock that panics when read, for exercising the panic guard
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingClock;

impl Clock for PanickingClock {
    fn now(&self) -> i64 {
        panic!("clock unavailable")
    }
}

/// Logger that keeps every failure it receives
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<AuthFailure>>,
}

impl RecordingLogger {
    /// Snapshot of the recorded failures
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by another test thread.
    #[must_use]
    pub fn entries(&self) -> Vec<AuthFailure> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuthLogger for RecordingLogger {
    fn log_failure(&self, failure: &AuthFailure) {
        self.entries.lock().unwrap().push(failure.clone());
    }
}

/// Logger that panics on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingLogger;

impl AuthLogger for PanickingLogger {
    fn log_failure(&self, _failure: &AuthFailure) {
        panic!("logger unavailable")
    }
}
