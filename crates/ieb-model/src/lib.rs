mod domain;
pub use domain::{DEFAULT_MARGIN_MS, DurationMs};

mod error;
pub use error::{ModelError, ModelResult};

mod strategy;
pub use strategy::{BackoffKind, BackoffStrategy, CountStrategy, DeadlineStrategy};
