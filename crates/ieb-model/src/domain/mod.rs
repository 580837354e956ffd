mod constants;
pub use constants::DEFAULT_MARGIN_MS;

/// Signed duration in milliseconds as it appears in configuration.
///
/// Signed: negative values are rejected by the backoff constructors, not by
/// deserialization.
pub type DurationMs = i64;
