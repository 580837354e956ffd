//! Conversions from declarative `ieb-model` strategies into ready states.
mod count;
pub use count::to_count_backoff;

mod deadline;
pub use deadline::to_deadline_backoff;

use time::{Duration, OffsetDateTime};

use ieb_model::{BackoffStrategy, DurationMs};

use crate::backoff::Backoff;
use crate::clock::Clock;
use crate::error::ConfigError;

/// Builds whichever variant the strategy describes.
///
/// `started_at` and `clock` are only used by the deadline variant.
pub fn to_backoff<C: Clock>(
    s: &BackoffStrategy,
    started_at: OffsetDateTime,
    clock: C,
) -> Result<Backoff<C>, ConfigError> {
    match s {
        BackoffStrategy::Count(c) => to_count_backoff(c).map(Backoff::Count),
        BackoffStrategy::Deadline(d) => {
            to_deadline_backoff(d, started_at, clock).map(Backoff::Deadline)
        }
    }
}

fn millis(ms: DurationMs) -> Duration {
    Duration::milliseconds(ms)
}
