//! Backoff state machines.
//!
//! Every state exposes the same stepping surface:
//! - `advance` applies one step and returns the wait, without waiting;
//! - `next` waits asynchronously on the tokio timer;
//! - `next_blocking` parks the current thread.
//!
//! The state is updated before the wait starts, so a dropped `next` future
//! still consumes its attempt.
mod count;
pub use count::CountBackoff;

mod deadline;
pub use deadline::{DEFAULT_DEADLINE_MARGIN, DeadlineBackoff};

use std::time::Duration as StdDuration;

use time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, NoRetriesLeft};

/// Either backoff variant behind one stepping surface.
#[derive(Debug, Clone)]
pub enum Backoff<C: Clock = SystemClock> {
    Count(CountBackoff),
    Deadline(DeadlineBackoff<C>),
}

impl<C: Clock> Backoff<C> {
    pub fn advance(&mut self) -> Result<StdDuration, NoRetriesLeft> {
        match self {
            Backoff::Count(b) => b.advance(),
            Backoff::Deadline(b) => b.advance(),
        }
    }

    pub async fn next(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        tokio::time::sleep(wait).await;
        Ok(())
    }

    pub fn next_blocking(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        std::thread::sleep(wait);
        Ok(())
    }

    pub fn peek(&self) -> StdDuration {
        match self {
            Backoff::Count(b) => b.peek(),
            Backoff::Deadline(b) => b.peek(),
        }
    }
}

impl<C: Clock> From<CountBackoff> for Backoff<C> {
    fn from(b: CountBackoff) -> Self {
        Backoff::Count(b)
    }
}

impl<C: Clock> From<DeadlineBackoff<C>> for Backoff<C> {
    fn from(b: DeadlineBackoff<C>) -> Self {
        Backoff::Deadline(b)
    }
}

fn ensure_non_negative(durations: &[Duration]) -> Result<(), ConfigError> {
    if durations.iter().any(|d| d.is_negative()) {
        return Err(ConfigError::NegativeDuration);
    }
    Ok(())
}

fn ensure_factor(factor: f64) -> Result<(), ConfigError> {
    // NaN fails this check as well.
    if factor > 0.0 && factor < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactor(factor))
    }
}

fn ensure_bounds_set(max: Duration, min: Duration) -> Result<(), ConfigError> {
    if max.is_zero() {
        return Err(ConfigError::ZeroMaxDuration);
    }
    if min.is_zero() {
        return Err(ConfigError::ZeroMinDuration);
    }
    Ok(())
}

fn ensure_ordered(max: Duration, min: Duration) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::MinExceedsMax { min, max });
    }
    Ok(())
}
