use std::env;

use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, warn};

use ieb_core::{Backoff, SystemClock, map::to_backoff};
use ieb_model::{BackoffStrategy, CountStrategy, DeadlineStrategy};
use ieb_observe::{LoggerConfig, init_local_offset, init_logger};

/// JSON strategy to run instead of the built-in pair.
const ENV_STRATEGY: &str = "IEB_DEMO_STRATEGY";
/// How many attempts fail before the operation succeeds.
const ENV_FAILURES: &str = "IEB_DEMO_FAILURES";

const DEFAULT_FAILURES: u32 = 3;

fn main() -> anyhow::Result<()> {
    // before any thread exists, see init_local_offset
    init_local_offset();

    // 1) logger
    let cfg = LoggerConfig::from_env()?;
    init_logger(&cfg)?;
    info!("logger initialized");

    // 2) strategies
    let strategies = match env::var(ENV_STRATEGY) {
        Ok(raw) => vec![
            raw.parse::<BackoffStrategy>()
                .with_context(|| format!("parsing {ENV_STRATEGY}"))?,
        ],
        Err(_) => default_strategies(),
    };
    let failures = match env::var(ENV_FAILURES) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("parsing {ENV_FAILURES}"))?,
        Err(_) => DEFAULT_FAILURES,
    };

    // 3) retry loops
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        for strategy in &strategies {
            let backoff = to_backoff(strategy, OffsetDateTime::now_utc(), SystemClock)?;
            let mut op = Flaky::new(failures);
            let outcome = retry(backoff, &mut op).await;
            info!(
                kind = %strategy.kind(),
                attempts = op.attempts,
                succeeded = outcome.is_ok(),
                "retry loop finished"
            );
        }
        anyhow::Ok(())
    })
}

fn default_strategies() -> Vec<BackoffStrategy> {
    vec![
        CountStrategy {
            max_ms: 2_000,
            min_ms: 250,
            factor: 0.5,
            retries: 5,
        }
        .into(),
        DeadlineStrategy {
            max_ms: 2_000,
            min_ms: 250,
            timeout_ms: 4_000,
            factor: 0.5,
            margin_ms: Some(100),
        }
        .into(),
    ]
}

/// Operation that fails a fixed number of times before succeeding.
struct Flaky {
    failures_left: u32,
    attempts: u32,
}

impl Flaky {
    fn new(failures: u32) -> Self {
        Self {
            failures_left: failures,
            attempts: 0,
        }
    }

    fn call(&mut self) -> Result<(), String> {
        self.attempts += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(format!("attempt {} failed", self.attempts));
        }
        Ok(())
    }
}

/// Calls `op` until it succeeds or `backoff` refuses another attempt.
async fn retry<C: ieb_core::Clock>(mut backoff: Backoff<C>, op: &mut Flaky) -> Result<(), String> {
    loop {
        let err = match op.call() {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        warn!(error = %err, next_wait = ?backoff.peek(), "operation failed");
        if backoff.next().await.is_err() {
            return Err(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ieb_core::CountBackoff;

    fn count(retries: i64) -> Backoff {
        CountBackoff::new(
            time::Duration::seconds(2),
            time::Duration::milliseconds(250),
            0.5,
            retries,
        )
        .unwrap()
        .into()
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_failures_are_spent() {
        let mut op = Flaky::new(3);
        assert!(retry(count(5), &mut op).await.is_ok());
        assert_eq!(op.attempts, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_with_last_error() {
        let mut op = Flaky::new(10);
        let err = retry(count(2), &mut op).await.unwrap_err();
        // the first call plus one per granted retry
        assert_eq!(op.attempts, 3);
        assert_eq!(err, "attempt 3 failed");
    }

    #[test]
    fn default_strategies_are_valid() {
        for s in default_strategies() {
            assert!(to_backoff(&s, OffsetDateTime::now_utc(), SystemClock).is_ok());
        }
    }
}
