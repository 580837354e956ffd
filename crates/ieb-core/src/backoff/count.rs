use std::time::Duration as StdDuration;

use time::Duration;
use tracing::debug;

use super::{ensure_bounds_set, ensure_factor, ensure_non_negative, ensure_ordered};
use crate::error::{ConfigError, NoRetriesLeft};

/// Backoff bounded by a number of retries.
///
/// Waits start at `max` and are multiplied by `factor` after every step.
/// A decayed value that would not stay above `min` is discarded and the
/// previous wait is repeated instead.
///
/// ```rust
/// use std::time::Duration as StdDuration;
/// use ieb_core::CountBackoff;
/// use time::Duration;
///
/// let mut b = CountBackoff::new(Duration::seconds(5), Duration::seconds(1), 0.5, 3).unwrap();
/// assert_eq!(b.advance(), Ok(StdDuration::from_secs(5)));
/// assert_eq!(b.advance(), Ok(StdDuration::from_millis(2_500)));
/// assert_eq!(b.advance(), Ok(StdDuration::from_millis(1_250)));
/// assert!(b.advance().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CountBackoff {
    min: Duration,
    factor: f64,
    next_delay: Duration,
    retries_left: u64,
}

impl CountBackoff {
    /// Validates the configuration and returns a state whose first wait is `max`.
    ///
    /// Checks run in a fixed order and the first failing one is reported:
    /// negative durations, factor, zero max, zero min, `min > max`, retries.
    pub fn new(
        max: Duration,
        min: Duration,
        factor: f64,
        retries: i64,
    ) -> Result<Self, ConfigError> {
        ensure_non_negative(&[max, min])?;
        ensure_factor(factor)?;
        ensure_bounds_set(max, min)?;
        ensure_ordered(max, min)?;
        if retries <= 0 {
            return Err(ConfigError::ZeroRetries);
        }

        Ok(Self {
            min,
            factor,
            next_delay: max,
            retries_left: retries.unsigned_abs(),
        })
    }

    /// Consumes one retry and returns how long to wait before it.
    ///
    /// Once the retries are spent this keeps returning [`NoRetriesLeft`]
    /// and leaves the state untouched.
    pub fn advance(&mut self) -> Result<StdDuration, NoRetriesLeft> {
        if self.retries_left == 0 {
            debug!("count backoff exhausted");
            return Err(NoRetriesLeft);
        }

        let wait = self.next_delay;
        self.retries_left -= 1;

        let candidate = wait * self.factor;
        if candidate > self.min {
            self.next_delay = candidate;
        }

        debug!(
            wait = ?wait,
            next = ?self.next_delay,
            retries_left = self.retries_left,
            "count backoff step"
        );
        Ok(wait.unsigned_abs())
    }

    /// Waits for the current delay on the tokio timer.
    pub async fn next(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        tokio::time::sleep(wait).await;
        Ok(())
    }

    /// Same as [`CountBackoff::next`] but parks the calling thread.
    pub fn next_blocking(&mut self) -> Result<(), NoRetriesLeft> {
        let wait = self.advance()?;
        std::thread::sleep(wait);
        Ok(())
    }

    /// Delay the next successful step will wait.
    pub fn peek(&self) -> StdDuration {
        self.next_delay.unsigned_abs()
    }

    pub fn retries_left(&self) -> u64 {
        self.retries_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> StdDuration {
        StdDuration::from_secs_f64(s)
    }

    #[test]
    fn rejects_invalid_configuration_in_order() {
        let cases = [
            (Duration::seconds(-5), Duration::seconds(1), 0.5, 10, ConfigError::NegativeDuration),
            (Duration::seconds(5), Duration::seconds(-1), 0.5, 10, ConfigError::NegativeDuration),
            // negative wins over a bad factor
            (Duration::seconds(-5), Duration::seconds(1), 2.0, 10, ConfigError::NegativeDuration),
            (Duration::ZERO, Duration::seconds(1), 0.5, 10, ConfigError::ZeroMaxDuration),
            (Duration::seconds(5), Duration::ZERO, 0.5, 10, ConfigError::ZeroMinDuration),
            (
                Duration::seconds(1),
                Duration::seconds(5),
                0.5,
                10,
                ConfigError::MinExceedsMax {
                    min: Duration::seconds(5),
                    max: Duration::seconds(1),
                },
            ),
            (Duration::seconds(5), Duration::seconds(1), 0.5, 0, ConfigError::ZeroRetries),
            (Duration::seconds(5), Duration::seconds(1), 0.5, -3, ConfigError::ZeroRetries),
        ];

        for (max, min, factor, retries, expected) in cases {
            let err = CountBackoff::new(max, min, factor, retries).unwrap_err();
            assert_eq!(err, expected, "max={max} min={min} retries={retries}");
        }
    }

    #[test]
    fn factor_must_be_strictly_between_zero_and_one() {
        for factor in [1.5, 1.0, 0.0] {
            let err = CountBackoff::new(Duration::minutes(4), Duration::seconds(30), factor, 10)
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidFactor(f) if f == factor));
        }

        assert!(CountBackoff::new(Duration::minutes(4), Duration::seconds(30), 0.9, 10).is_ok());
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = CountBackoff::new(Duration::seconds(1), Duration::seconds(5), 0.5, 10)
            .unwrap_err()
            .to_string();
        assert!(err.contains("min duration should be less than or equal to max duration"));

        let err = CountBackoff::new(Duration::seconds(5), Duration::seconds(1), 0.5, 0)
            .unwrap_err()
            .to_string();
        assert!(err.contains("number of retries should be greater than zero"));
    }

    #[test]
    fn min_equal_to_max_is_allowed() {
        let mut b = CountBackoff::new(Duration::seconds(2), Duration::seconds(2), 0.5, 2).unwrap();
        assert_eq!(b.advance(), Ok(secs(2.0)));
        assert_eq!(b.advance(), Ok(secs(2.0)));
        assert_eq!(b.advance(), Err(NoRetriesLeft));
    }

    #[test]
    fn grants_exactly_the_configured_retries() {
        let mut b =
            CountBackoff::new(Duration::seconds(30), Duration::seconds(5), 0.5, 5).unwrap();

        let waits: Vec<_> = (0..5).map(|_| b.advance().unwrap()).collect();
        assert_eq!(
            waits,
            vec![secs(30.0), secs(15.0), secs(7.5), secs(7.5), secs(7.5)]
        );
        assert_eq!(b.retries_left(), 0);
        assert_eq!(b.advance(), Err(NoRetriesLeft));
    }

    #[test]
    fn small_budget_ends_on_fourth_step() {
        let mut b = CountBackoff::new(Duration::seconds(5), Duration::seconds(1), 0.5, 3).unwrap();

        let mut granted = 0;
        while b.advance().is_ok() {
            granted += 1;
            assert!(granted <= 3, "more steps granted than configured");
        }
        assert_eq!(granted, 3);
    }

    #[test]
    fn delays_never_increase_nor_drop_below_min() {
        let min = secs(0.7);
        let mut b = CountBackoff::new(Duration::seconds(9), Duration::milliseconds(700), 0.8, 40)
            .unwrap();

        let mut prev = b.peek();
        while let Ok(wait) = b.advance() {
            assert!(wait <= prev, "{wait:?} grew after {prev:?}");
            assert!(wait >= min, "{wait:?} fell below {min:?}");
            prev = wait;
        }
    }

    #[test]
    fn exhaustion_is_sticky() {
        let mut b = CountBackoff::new(Duration::seconds(1), Duration::seconds(1), 0.5, 1).unwrap();
        assert!(b.advance().is_ok());

        for _ in 0..5 {
            assert_eq!(b.advance(), Err(NoRetriesLeft));
            assert_eq!(b.peek(), secs(1.0));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn next_waits_for_each_delay() {
        let mut b =
            CountBackoff::new(Duration::seconds(30), Duration::seconds(5), 0.5, 5).unwrap();
        let start = tokio::time::Instant::now();

        for _ in 0..5 {
            assert!(b.next().await.is_ok());
        }
        let waited = start.elapsed();
        assert!(waited >= secs(67.5), "waited only {waited:?}");

        let before = tokio::time::Instant::now();
        assert_eq!(b.next().await, Err(NoRetriesLeft));
        assert_eq!(before.elapsed(), StdDuration::ZERO);
    }

    #[test]
    fn next_blocking_parks_the_thread() {
        let mut b =
            CountBackoff::new(Duration::milliseconds(20), Duration::milliseconds(5), 0.5, 2)
                .unwrap();
        let start = std::time::Instant::now();

        assert!(b.next_blocking().is_ok());
        assert!(b.next_blocking().is_ok());
        assert_eq!(b.next_blocking(), Err(NoRetriesLeft));

        assert!(start.elapsed() >= StdDuration::from_millis(30));
    }
}
