use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::domain::DurationMs;

/// Backoff bounded by a number of retries.
///
/// The first wait is `max_ms`; every following wait is the previous one
/// multiplied by `factor` for as long as the result stays above `min_ms`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CountStrategy {
    pub max_ms: DurationMs,
    pub min_ms: DurationMs,
    pub factor: f64,
    pub retries: i64,
}
