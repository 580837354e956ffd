//! Inverse exponential backoff.
//!
//! Delays start at a maximum and shrink geometrically toward a minimum.
//! Two bounding rules are provided:
//! - [`CountBackoff`]: a fixed number of waits;
//! - [`DeadlineBackoff`]: waits until a wall-clock deadline, shortening the
//!   last one so a final attempt still lands before the deadline.
//!
//! The caller owns the retry loop:
//! ```no_run
//! use ieb_core::CountBackoff;
//! use time::Duration;
//!
//! # async fn fetch() -> Result<(), ()> { Ok(()) }
//! # async fn run() -> Result<(), ieb_core::ConfigError> {
//! let mut backoff = CountBackoff::new(Duration::seconds(30), Duration::seconds(5), 0.5, 5)?;
//! loop {
//!     if fetch().await.is_ok() {
//!         break;
//!     }
//!     if backoff.next().await.is_err() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
pub mod backoff;
pub mod clock;
pub mod error;
pub mod map;

pub use backoff::{Backoff, CountBackoff, DEFAULT_DEADLINE_MARGIN, DeadlineBackoff};
pub use clock::{Clock, SystemClock, TokioClock};
pub use error::{ConfigError, NoRetriesLeft};

pub mod prelude {
    pub use crate::backoff::{Backoff, CountBackoff, DeadlineBackoff};
    pub use crate::clock::{Clock, SystemClock, TokioClock};
    pub use crate::error::{ConfigError, NoRetriesLeft};
    pub use crate::map::{to_backoff, to_count_backoff, to_deadline_backoff};
}
