use thiserror::Error;
use time::Duration;

/// Rejected backoff configuration.
///
/// Returned only by constructors; a state is never built from invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("negative duration is not allowed")]
    NegativeDuration,

    #[error("factor should be between 0 and 1, got {0}")]
    InvalidFactor(f64),

    #[error("max duration should be greater than zero")]
    ZeroMaxDuration,

    #[error("min duration should be greater than zero")]
    ZeroMinDuration,

    #[error("timeout duration should be greater than zero")]
    ZeroTimeoutDuration,

    #[error("min duration should be less than or equal to max duration (min {min}, max {max})")]
    MinExceedsMax { min: Duration, max: Duration },

    #[error("number of retries should be greater than zero")]
    ZeroRetries,

    #[error("start time should not be zero")]
    InvalidStartTime,

    #[error("deadline is out of the representable time range")]
    DeadlineOverflow,
}

/// The retry budget is spent; the caller should stop retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no more retries left")]
pub struct NoRetriesLeft;
