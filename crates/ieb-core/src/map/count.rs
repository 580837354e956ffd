use ieb_model::CountStrategy;

use super::millis;
use crate::backoff::CountBackoff;
use crate::error::ConfigError;

pub fn to_count_backoff(s: &CountStrategy) -> Result<CountBackoff, ConfigError> {
    CountBackoff::new(millis(s.max_ms), millis(s.min_ms), s.factor, s.retries)
}
