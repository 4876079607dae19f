//! Time utilities and abstractions
//!
//! This module provides the seams time-dependent code is written against:
//! - **[`clock`]**: monotonic and wall-clock readings behind [`Clock`]
//! - **[`sleep`]**: awaitable delays behind [`Sleeper`]
//!
//! Production code takes an `Arc<dyn Sleeper>` so tests can substitute
//! `testing::RecordingSleeper` and assert on requested delays without
//! waiting.
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use std::time::Duration;
//!
//! use framesync_common::time::{Sleeper, TokioSleeper};
//!
//! # tokio_test::block_on(async {
//! TokioSleeper.sleep(Duration::from_millis(1)).await;
//! # });
//! # }
//! ```

pub mod clock;
pub mod sleep;

pub use clock::{Clock, SystemClock};
pub use sleep::{Sleeper, TokioSleeper};
