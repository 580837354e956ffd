use time::OffsetDateTime;

use ieb_model::DeadlineStrategy;

use super::millis;
use crate::backoff::DeadlineBackoff;
use crate::clock::Clock;
use crate::error::ConfigError;

pub fn to_deadline_backoff<C: Clock>(
    s: &DeadlineStrategy,
    started_at: OffsetDateTime,
    clock: C,
) -> Result<DeadlineBackoff<C>, ConfigError> {
    let backoff = DeadlineBackoff::with_clock(
        millis(s.max_ms),
        millis(s.min_ms),
        millis(s.timeout_ms),
        s.factor,
        started_at,
        clock,
    )?;
    Ok(backoff.with_margin(millis(s.effective_margin_ms())))
}
