use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::domain::{DEFAULT_MARGIN_MS, DurationMs};

/// Backoff bounded by a wall-clock deadline (`start + timeout_ms`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStrategy {
    pub max_ms: DurationMs,
    pub min_ms: DurationMs,
    pub timeout_ms: DurationMs,
    pub factor: f64,
    /// Time kept free before the deadline when the final wait is shortened.
    ///
    /// Falls back to [`DEFAULT_MARGIN_MS`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_ms: Option<DurationMs>,
}

impl DeadlineStrategy {
    pub fn effective_margin_ms(&self) -> DurationMs {
        self.margin_ms.unwrap_or(DEFAULT_MARGIN_MS)
    }
}
