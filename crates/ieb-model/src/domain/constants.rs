//! Common model-level constants.

/// Safety margin kept before the deadline when the last retry is squeezed in.
///
/// Used by [`crate::DeadlineStrategy`] when `marginMs` is not provided.
pub const DEFAULT_MARGIN_MS: i64 = 1_000;
