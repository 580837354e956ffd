use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Rule that ends a backoff sequence.
///
/// - `Count`: stop after a configured number of waits.
/// - `Deadline`: stop once the wall-clock deadline is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum BackoffKind {
    Count,
    Deadline,
}

impl FromStr for BackoffKind {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "retries" => Ok(BackoffKind::Count),
            "deadline" | "timeout" => Ok(BackoffKind::Deadline),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for BackoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackoffKind::Count => "count",
            BackoffKind::Deadline => "deadline",
        })
    }
}
