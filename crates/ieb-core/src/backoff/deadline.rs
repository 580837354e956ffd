use std::time::Duration as StdDuration;

use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{ensure_bounds_set, ensure_factor, ensure_non_negative, ensure_ordered};
use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, NoRetriesLeft};

/// Time kept free before the deadline when the final wait is shortened.
pub const DEFAULT_DEADLINE_MARGIN: Duration = Duration::SECOND;

/// Backoff bounded by a wall-clock deadline.
///
/// Waits start at `max` and decay by `factor` toward `min`. When the time
/// left after a wait is too small for the next decayed step, the following
/// wait is cut to `remaining - margin` so that one last attempt still happens
/// before `started_at + timeout`.
///
/// Steps stop being granted once the deadline has passed or the computed
/// wait has dropped to zero.
#[derive(Debug, Clone)]
pub struct DeadlineBackoff<C: Clock = SystemClock> {
    min: Duration,
    factor: f64,
    margin: Duration,
    next_delay: Duration,
    started_at: OffsetDateTime,
    deadline: OffsetDateTime,
    clock: C,
}

impl DeadlineBackoff<SystemClock> {
    /// Builds a state measured against the system clock.
    ///
    /// See [`DeadlineBackoff::with_clock`] for the validation rules.
    pub fn new(
        max: Duration,
        min: Duration,
        timeout: Duration,
        factor: f64,
        started_at: OffsetDateTime,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(max, min, timeout, factor, started_at, SystemClock)
    }
}

impl<C: Clock> DeadlineBackoff<C> {
    /// Validates the configuration and returns a state whose first wait is `max`.
    ///
    /// Checks run in a fixed order and the first failing one is reported:
    /// negative durations, factor, zero max, zero min, zero timeout,
    /// `min > max`, start time. A `started_at` equal to the Unix epoch
    /// counts as unset.
    pub fn with_clock(
        max: Duration,
        min: Duration,
        timeout: Duration,
        factor: f64,
        started_at: OffsetDateTime,
        clock: C,
    ) -> Result<Self, ConfigError> {
        ensure_non_negative(&[max, min, timeout])?;
        ensure_factor(factor)?;
        ensure_bounds_set(max, min)?;
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeoutDuration);
        }
        ensure_ordered(max, min)?;
        if started_at == OffsetDateTime::UNIX_EPOCH {
            return Err(ConfigError::InvalidStartTime);
        }
        let deadline = started_at
            .checked_add(timeout)
            .ok_or(ConfigError::DeadlineOverflow)?;

        Ok(Self {
            min,
            factor,
            margin: DEFAULT_DEADLINE_MARGIN,
            next_delay: max,
            started_at,
            deadline,
            clock,
        })
    }

    /// Overrides [`DEFAULT_DEADLINE_MARGIN`]. Negative margins are treated as zero.
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin.max(Duration::ZERO);
        self
    }

    /// Grants one step and returns how long to wait before it.
    ///
    /// Fails without changing the state when the deadline has passed or no
    /// wait is left. Otherwise the next wait is planned against the time that
    /// will remain once the returned wait is over.
    pub fn advance(&mut self) -> Result<StdDuration, NoRetriesLeft> {
        let remaining = self.remaining();
        if remaining <= Duration::ZERO || self.next_delay <= Duration::ZERO {
            debug!(remaining = ?remaining, "deadline backoff exhausted");
            return Err(NoRetriesLeft);
        }

        let wait = self.next_delay;
        self.next_delay = self.decay(wait, remaining.saturating_sub(wait));

        debug!(
            wait = ?wait,
            next = ?self.next_delay,
            remaining = ?remaining,
            "deadline backoff step"
        );
        Ok(wait.unsigned_abs())
    }

    /// Waits for the current delay on the tokio timer.
    pub async fn next(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        tokio::time::sleep(wait).await;
        Ok(())
    }

    /// Same as [`DeadlineBackoff::next`] but parks the calling thread.
    pub fn next_blocking(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        std::thread::sleep(wait);
        Ok(())
    }

    /// Delay the next successful step will wait.
    pub fn peek(&self) -> StdDuration {
        self.next_delay.unsigned_abs()
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn deadline(&self) -> OffsetDateTime {
        self.deadline
    }

    /// Time left until the deadline; negative once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline - self.clock.now()
    }

    /// Plans the wait that follows `wait`, given the budget left after it.
    fn decay(&self, wait: Duration, remaining_after: Duration) -> Duration {
        let candidate = wait * self.factor;
        let last_chance = remaining_after.saturating_sub(self.margin).max(Duration::ZERO);
        let above_min = remaining_after.saturating_sub(self.min);

        if candidate > self.min {
            if remaining_after > candidate {
                candidate
            } else {
                last_chance
            }
        } else if above_min > self.margin {
            self.min
        } else if above_min <= self.min && remaining_after > self.margin {
            last_chance
        } else {
            // Zero here makes the next advance report exhaustion right away.
            Duration::ZERO
        }
    }
}
