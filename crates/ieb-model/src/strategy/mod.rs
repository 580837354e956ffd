mod count;
pub use count::CountStrategy;

mod deadline;
pub use deadline::DeadlineStrategy;

mod kind;
pub use kind::BackoffKind;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Declarative description of a backoff sequence.
///
/// The `kind` tag selects the bounding rule:
/// - `count`: a fixed number of decaying waits;
/// - `deadline`: decaying waits until a wall-clock deadline.
///
/// ```rust
/// use ieb_model::{BackoffKind, BackoffStrategy};
///
/// let json = r#"{"kind":"count","maxMs":30000,"minMs":5000,"factor":0.5,"retries":5}"#;
/// let strategy: BackoffStrategy = serde_json::from_str(json).unwrap();
/// assert_eq!(strategy.kind(), BackoffKind::Count);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BackoffStrategy {
    Count(CountStrategy),
    Deadline(DeadlineStrategy),
}

impl BackoffStrategy {
    pub fn kind(&self) -> BackoffKind {
        match self {
            BackoffStrategy::Count(_) => BackoffKind::Count,
            BackoffStrategy::Deadline(_) => BackoffKind::Deadline,
        }
    }
}

impl FromStr for BackoffStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        serde_json::from_str(s).map_err(|e| ModelError::Invalid(e.to_string()))
    }
}

impl From<CountStrategy> for BackoffStrategy {
    fn from(s: CountStrategy) -> Self {
        BackoffStrategy::Count(s)
    }
}

impl From<DeadlineStrategy> for BackoffStrategy {
    fn from(s: DeadlineStrategy) -> Self {
        BackoffStrategy::Deadline(s)
    }
}
