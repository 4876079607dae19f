//! Reconciliation pass orchestration
//!
//! One pass runs `Diffing → Writing → VerifyingCounts → (Resolving →
//! VerifyingCounts)* → Emitting`. Remote calls are issued sequentially and
//! each one races the caller's cancellation token. Transport failures abort
//! the pass; only post-write identity resolution is retried.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use framesync_common::time::Sleeper;
use framesync_domain::{
    ChangeSet, FramesyncError, ReconcileConfig, RemoteItemSummary, Result, SyncMode, SyncRecord,
    constants::{DEFAULT_RESOLUTION_ATTEMPTS, DEFAULT_RESOLUTION_BACKOFF_MS},
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::change_set;
use super::identity::IdentityIndex;
use super::request::{ReconcileRequest, RequestedItem};
use crate::session::FramerSession;

/// Bounds on post-write resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPolicy {
    /// Total resolution attempts, the first one included
    pub max_attempts: u32,
    /// Linear step: attempt `k > 1` waits `backoff_step * (k - 1)`
    pub backoff_step: Duration,
}

impl ResolutionPolicy {
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt.saturating_sub(1)
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESOLUTION_ATTEMPTS,
            backoff_step: Duration::from_millis(DEFAULT_RESOLUTION_BACKOFF_MS),
        }
    }
}

impl From<&ReconcileConfig> for ResolutionPolicy {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            max_attempts: config.resolution_attempts,
            backoff_step: Duration::from_millis(config.resolution_backoff_ms),
        }
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// One record per requested item, in request order
    pub records: Vec<SyncRecord>,
    /// Items sent in the write batch
    pub written: usize,
    /// Items dropped from the batch as unchanged
    pub skipped: usize,
    /// Collection re-fetches made to resolve identities
    pub resolution_attempts: u32,
    /// Request positions left without a remote identity
    pub unresolved: Vec<usize>,
    /// Resolution was cut short by cancellation
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Diffing,
    Writing,
    VerifyingCounts,
    Resolving,
    Emitting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diffing => "diffing",
            Self::Writing => "writing",
            Self::VerifyingCounts => "verifying_counts",
            Self::Resolving => "resolving",
            Self::Emitting => "emitting",
        };
        f.write_str(name)
    }
}

/// Per-item bookkeeping kept across phases
#[derive(Debug, Default)]
struct Tracked {
    lookup_id: Option<String>,
    slug: Option<String>,
    written: bool,
    resolved: Option<RemoteItemSummary>,
}

impl Tracked {
    fn is_keyless(&self) -> bool {
        self.lookup_id.is_none() && self.slug.is_none()
    }

    fn fill_from(&mut self, index: &IdentityIndex) {
        if self.resolved.is_none() {
            self.resolved = index.resolve(self.lookup_id.as_deref(), self.slug.as_deref()).cloned();
        }
    }
}

/// Mutable state of a single pass
struct Pass<'a> {
    request: &'a ReconcileRequest,
    tracked: Vec<Tracked>,
    batch: Vec<ChangeSet>,
    attempts: u32,
    cancelled: bool,
}

impl<'a> Pass<'a> {
    fn new(request: &'a ReconcileRequest) -> Self {
        let tracked = request
            .items
            .iter()
            .map(|item| Tracked {
                lookup_id: item.desired.id.clone(),
                slug: item.desired.slug.clone(),
                ..Tracked::default()
            })
            .collect();
        Self { request, tracked, batch: Vec::new(), attempts: 0, cancelled: false }
    }

    fn resolved_count(&self) -> usize {
        self.tracked.iter().filter(|item| item.resolved.is_some()).count()
    }

    fn fill_from(&mut self, index: &IdentityIndex) {
        for item in &mut self.tracked {
            item.fill_from(index);
        }
    }
}

/// Drives reconciliation passes against one open session
pub struct SyncCoordinator {
    session: Arc<dyn FramerSession>,
    sleeper: Arc<dyn Sleeper>,
    policy: ResolutionPolicy,
}

impl SyncCoordinator {
    pub fn new(session: Arc<dyn FramerSession>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { session, sleeper, policy: ResolutionPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Make the remote collection match `request`.
    ///
    /// Under-resolution after all attempts is reported per item, never as
    /// an error. Cancellation during resolution returns the records
    /// resolved so far with `cancelled` set.
    ///
    /// # Errors
    /// Transport errors from any remote call, or `FramesyncError::Cancelled`
    /// when cancelled before the write completed.
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
        cancel: &CancellationToken,
    ) -> Result<ReconcileReport> {
        if cancel.is_cancelled() {
            return Err(cancelled(Phase::Diffing));
        }

        let mut pass = Pass::new(request);
        let mut phase = Phase::Diffing;
        loop {
            debug!(collection_id = %request.collection_id, %phase, "reconcile phase");
            phase = match phase {
                Phase::Diffing => {
                    self.diff(&mut pass, cancel).await?;
                    Phase::Writing
                }
                Phase::Writing => {
                    self.write(&mut pass, cancel).await?;
                    Phase::VerifyingCounts
                }
                Phase::VerifyingCounts => self.verify(&pass),
                Phase::Resolving => self.resolve(&mut pass, cancel).await?,
                Phase::Emitting => return Ok(emit(pass)),
            };
        }
    }

    async fn diff(&self, pass: &mut Pass<'_>, cancel: &CancellationToken) -> Result<()> {
        let request = pass.request;
        let index = match request.mode {
            SyncMode::DiffChangedOnly => {
                let items = race(
                    cancel,
                    Phase::Diffing,
                    self.session.collection_items(&request.collection_id),
                )
                .await?;
                Some(IdentityIndex::build(items.into_iter().map(RemoteItemSummary::from)))
            }
            SyncMode::ReplaceFull => None,
        };

        for (item, tracked) in request.items.iter().zip(pass.tracked.iter_mut()) {
            let RequestedItem { desired, .. } = item;
            let existing = index
                .as_ref()
                .and_then(|index| index.resolve(desired.id.as_deref(), desired.slug.as_deref()));

            let change = match request.mode {
                SyncMode::DiffChangedOnly => change_set::build(desired, existing),
                SyncMode::ReplaceFull => Some(change_set::full(desired, existing)),
            };

            match change {
                Some(change) => {
                    if change.id.is_some() {
                        tracked.lookup_id.clone_from(&change.id);
                    }
                    tracked.written = true;
                    pass.batch.push(change);
                }
                None => tracked.resolved = existing.cloned(),
            }
        }

        info!(
            collection_id = %request.collection_id,
            requested = request.len(),
            written = pass.batch.len(),
            skipped = request.len() - pass.batch.len(),
            mode = ?request.mode,
            "reconcile write batch prepared"
        );
        Ok(())
    }

    async fn write(&self, pass: &mut Pass<'_>, cancel: &CancellationToken) -> Result<()> {
        if pass.batch.is_empty() {
            return Ok(());
        }

        let confirmed = race(
            cancel,
            Phase::Writing,
            self.session.add_items(&pass.request.collection_id, &pass.batch),
        )
        .await?;
        debug!(sent = pass.batch.len(), confirmed = confirmed.len(), "write batch confirmed");

        let index = IdentityIndex::build(confirmed.into_iter().map(RemoteItemSummary::from));
        pass.fill_from(&index);
        Ok(())
    }

    fn verify(&self, pass: &Pass<'_>) -> Phase {
        let requested = pass.tracked.len();
        let resolved = pass.resolved_count();
        if resolved >= requested {
            return Phase::Emitting;
        }
        if pass.attempts >= self.policy.max_attempts {
            warn!(
                collection_id = %pass.request.collection_id,
                requested,
                resolved,
                attempts = pass.attempts,
                "items left unresolved after write"
            );
            return Phase::Emitting;
        }
        let resolvable = pass.tracked.iter().any(|item| item.resolved.is_none() && !item.is_keyless());
        if !resolvable {
            debug!(requested, resolved, "remaining items have no id or slug to resolve by");
            return Phase::Emitting;
        }
        Phase::Resolving
    }

    async fn resolve(&self, pass: &mut Pass<'_>, cancel: &CancellationToken) -> Result<Phase> {
        pass.attempts += 1;
        let attempt = pass.attempts;

        let delay = self.policy.delay_before(attempt);
        if !delay.is_zero() {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    pass.cancelled = true;
                    return Ok(Phase::Emitting);
                }
                () = self.sleeper.sleep(delay) => {}
            }
        }

        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            fetched = self.session.collection_items(&pass.request.collection_id) => Some(fetched?),
        };
        let Some(items) = fetched else {
            pass.cancelled = true;
            return Ok(Phase::Emitting);
        };

        let before = pass.resolved_count();
        pass.fill_from(&IdentityIndex::build(items.into_iter().map(RemoteItemSummary::from)));
        debug!(
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            newly_resolved = pass.resolved_count() - before,
            "resolution attempt finished"
        );
        Ok(Phase::VerifyingCounts)
    }
}

fn emit(pass: Pass<'_>) -> ReconcileReport {
    if pass.cancelled {
        warn!(
            collection_id = %pass.request.collection_id,
            resolved = pass.resolved_count(),
            "resolution cancelled, emitting partial results"
        );
    }

    let mut unresolved = Vec::new();
    let records = pass
        .request
        .items
        .iter()
        .zip(&pass.tracked)
        .enumerate()
        .map(|(position, (item, tracked))| {
            if tracked.resolved.is_none() {
                unresolved.push(position);
            }
            sync_record(item, tracked)
        })
        .collect();

    ReconcileReport {
        records,
        written: pass.batch.len(),
        skipped: pass.request.len() - pass.batch.len(),
        resolution_attempts: pass.attempts,
        unresolved,
        cancelled: pass.cancelled,
    }
}

fn sync_record(item: &RequestedItem, tracked: &Tracked) -> SyncRecord {
    let RequestedItem { desired, hints } = item;
    let resolved = tracked.resolved.as_ref();

    // Unresolved items still report the requested id; `has_framer_id` is
    // what tells the caller the identity was never confirmed.
    let framer_item_id = resolved
        .map(|remote| remote.id.clone())
        .filter(|id| !id.is_empty())
        .or_else(|| desired.id.clone())
        .or_else(|| hints.framer_item_id.clone())
        .unwrap_or_default();

    let name = hints
        .name
        .clone()
        .or_else(|| desired.slug.clone())
        .or_else(|| resolved.and_then(|remote| remote.slug.clone()))
        .unwrap_or_default();

    SyncRecord {
        notion_page_id: hints.notion_page_id.clone().unwrap_or_default(),
        framer_item_id,
        last_sync_hash: hints.last_sync_hash.clone().unwrap_or_default(),
        content_hash: hints.content_hash.clone().unwrap_or_default(),
        has_framer_id: hints.has_framer_id.unwrap_or(resolved.is_some()),
        is_changed: hints.is_changed.unwrap_or(true),
        name,
    }
}

async fn race<T>(
    cancel: &CancellationToken,
    phase: Phase,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(cancelled(phase)),
        result = call => result,
    }
}

fn cancelled(phase: Phase) -> FramesyncError {
    FramesyncError::Cancelled(format!("reconciliation cancelled during {phase}"))
}
