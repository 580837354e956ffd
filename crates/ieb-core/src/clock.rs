//! Wall-clock source for deadline bookkeeping.
use time::OffsetDateTime;

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Reads the system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Wall time advanced by tokio's monotonic clock.
///
/// Captures the system time once and then moves forward with
/// [`tokio::time::Instant`], so it follows a paused or auto-advanced tokio
/// clock and never jumps when the system time is adjusted.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    wall: OffsetDateTime,
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            wall: OffsetDateTime::now_utc(),
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> OffsetDateTime {
        self.wall + self.origin.elapsed()
    }
}
