//! Time source abstraction for run tracking.
//!
//! The completion tracker stamps synthesized messages with the instant tracking started.
//! Abstracting the clock behind a trait keeps that logic deterministic under test.

use chrono::Utc;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// A source of current time.
pub trait Clock: Send + Sync {
    /// Returns the current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> EpochMillis;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        Utc::now().timestamp_millis()
    }
}

/// [`Clock`] that always returns the same instant. Intended for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub EpochMillis);

impl Clock for FixedClock {
    fn now_millis(&self) -> EpochMillis {
        self.0
    }
}
