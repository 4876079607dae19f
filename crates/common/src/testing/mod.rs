//! Testing utilities and helpers
//!
//! - **[`time`]**: deterministic doubles for [`crate::time::Clock`] and
//!   [`crate::time::Sleeper`]
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::time::Duration;
//!
//! use framesync_common::testing::{MockClock, RecordingSleeper};
//! use framesync_common::time::Sleeper;
//!
//! # tokio_test::block_on(async {
//! let clock = MockClock::new();
//! let sleeper = RecordingSleeper::with_clock(clock.clone());
//! sleeper.sleep(Duration::from_millis(350)).await;
//!
//! assert_eq!(sleeper.recorded(), vec![Duration::from_millis(350)]);
//! assert_eq!(clock.elapsed(), Duration::from_millis(350));
//! # });
//! # }
//! ```

pub mod time;

pub use time::{MockClock, RecordingSleeper};
