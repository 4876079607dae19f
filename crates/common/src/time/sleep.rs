//! Awaitable delays
//!
//! Backoff loops sleep through a [`Sleeper`] rather than calling
//! `tokio::time::sleep` directly. The sleep is a plain future, so callers
//! race it against a cancellation token with `tokio::select!`.

use std::time::Duration;

use async_trait::async_trait;

/// Injectable sleep used by retry and backoff loops.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::trace!(delay_ms = duration.as_millis() as u64, "sleeping");
        tokio::time::sleep(duration).await;
    }
}
