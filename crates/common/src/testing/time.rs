//! Time doubles for deterministic tests
//!
//! [`MockClock`] only moves when told to. [`RecordingSleeper`] returns from
//! `sleep` immediately, remembers every requested delay and, when attached
//! to a clock, advances it by the same amount.

// Test utilities panic on poisoned mutexes to fail tests early
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;

use crate::time::{Clock, Sleeper};

/// Mock clock for deterministic testing
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use framesync_common::testing::MockClock;
/// use framesync_common::time::Clock;
///
/// let clock = MockClock::new();
/// let start = clock.now();
///
/// // Simulate 5 seconds passing
/// clock.advance(Duration::from_secs(5));
///
/// let end = clock.now();
/// assert_eq!(end.duration_since(start), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Create a new mock clock anchored at the current real time
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            base_system_time: SystemTime::now(),
        }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed += duration;
    }

    /// Set the mock clock to a specific elapsed time
    pub fn set_elapsed(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed = duration;
    }

    /// Get the current elapsed time
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("mutex poisoned")
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().expect("mutex poisoned")
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + *self.elapsed.lock().expect("mutex poisoned")
    }
}

/// [`Sleeper`] that never waits.
///
/// Clones share the same recording, so a test can hand one clone to the
/// code under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
    clock: Option<MockClock>,
}

impl RecordingSleeper {
    /// Create a sleeper that only records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sleeper that also advances `clock` on every sleep.
    pub fn with_clock(clock: MockClock) -> Self {
        Self { delays: Arc::default(), clock: Some(clock) }
    }

    /// Every delay requested so far, in call order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().expect("mutex poisoned").clone()
    }

    /// Number of `sleep` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.delays.lock().expect("mutex poisoned").len()
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delays.lock().expect("mutex poisoned").iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().expect("mutex poisoned").push(duration);
        if let Some(clock) = &self.clock {
            clock.advance(duration);
        }
    }
}
