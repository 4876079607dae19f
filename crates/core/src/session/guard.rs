//! Scoped session acquisition
//!
//! A session is released exactly once: explicitly through
//! [`SessionGuard::close`], or from `Drop` when the owning future errored
//! out early or was cancelled. The drop path hands the disconnect to the
//! current tokio runtime since `Drop` cannot await.

use std::future::Future;
use std::sync::Arc;

use framesync_domain::Result;
use tracing::{debug, warn};

use super::ports::{FramerSession, ProjectTarget, SessionConnector};

/// Owns an open session until it is closed or dropped
pub struct SessionGuard {
    session: Arc<dyn FramerSession>,
    released: bool,
}

impl SessionGuard {
    /// Wrap an already open session
    pub fn new(session: Arc<dyn FramerSession>) -> Self {
        Self { session, released: false }
    }

    /// Open a session through `connector`
    pub async fn connect(connector: &dyn SessionConnector, target: &ProjectTarget) -> Result<Self> {
        let session = connector.connect(target).await?;
        debug!(project_url = %target.project_url, "session opened");
        Ok(Self::new(session))
    }

    pub fn session(&self) -> &Arc<dyn FramerSession> {
        &self.session
    }

    /// Disconnect and consume the guard
    pub async fn close(mut self) -> Result<()> {
        self.released = true;
        let outcome = self.session.disconnect().await;
        debug!(success = outcome.is_ok(), "session closed");
        outcome
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("session guard dropped while open, disconnecting in background");
                handle.spawn(async move {
                    if let Err(err) = session.disconnect().await {
                        warn!(error = %err, "background session disconnect failed");
                    }
                });
            }
            Err(_) => warn!("session guard dropped outside a tokio runtime; session left open"),
        }
    }
}

/// Run `work` against a fresh session and always release it
///
/// A failed disconnect after successful work is logged, not returned; the
/// work's own error wins otherwise.
pub async fn with_session<T, F, Fut>(
    connector: &dyn SessionConnector,
    target: &ProjectTarget,
    work: F,
) -> Result<T>
where
    F: FnOnce(Arc<dyn FramerSession>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let guard = SessionGuard::connect(connector, target).await?;
    let outcome = work(Arc::clone(guard.session())).await;
    if let Err(err) = guard.close().await {
        warn!(error = %err, "session disconnect failed");
    }
    outcome
}
