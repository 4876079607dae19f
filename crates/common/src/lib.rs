//! Shared runtime utilities for the Framesync crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: dependency-free building blocks
//! - `runtime`: async time abstractions (clock, sleeper)
//! - `observability`: optional tracing (pulled in by `runtime`)
//! - `test-utils`: deterministic doubles for time-dependent code

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(any(feature = "runtime", test))]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

#[cfg(feature = "runtime")]
pub use time::{Clock, Sleeper, SystemClock, TokioSleeper};
