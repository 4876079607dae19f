//! End-to-end reconciliation passes against an in-memory session.

mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use framesync_common::testing::RecordingSleeper;
use framesync_common::time::Sleeper;
use framesync_core::reconcile::{ReconcileReport, ReconcileRequest, SyncCoordinator};
use framesync_domain::{FramesyncError, SyncMode};
use serde_json::json;
use support::{desired, remote_item, FakeSession, WriteMode};
use tokio_util::sync::CancellationToken;

fn coordinator(session: &FakeSession, sleeper: &RecordingSleeper) -> SyncCoordinator {
    SyncCoordinator::new(Arc::new(session.clone()), Arc::new(sleeper.clone()))
}

async fn run(session: &FakeSession, request: &ReconcileRequest) -> (ReconcileReport, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let report = coordinator(session, &sleeper)
        .reconcile(request, &CancellationToken::new())
        .await
        .expect("reconcile should succeed");
    (report, sleeper)
}

/// Sleeper that cancels the pass the moment a backoff starts.
struct CancellingSleeper(CancellationToken);

#[async_trait]
impl Sleeper for CancellingSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.0.cancel();
        std::future::pending::<()>().await;
    }
}

#[tokio::test]
async fn creates_missing_item_and_reports_new_id() {
    // Arrange
    let session = FakeSession::new("posts");
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({"title": "X"}))],
        SyncMode::DiffChangedOnly,
    );

    // Act
    let (report, sleeper) = run(&session, &request).await;

    // Assert
    let record = &report.records[0];
    assert_eq!(record.framer_item_id, "1");
    assert!(record.has_framer_id);
    assert_eq!(record.name, "a");
    assert_eq!(report.written, 1);
    assert_eq!(report.resolution_attempts, 0);
    assert_eq!(session.fetch_calls(), 1);
    assert_eq!(sleeper.calls(), 0);

    let writes = session.writes();
    assert_eq!(writes[0][0].slug.as_deref(), Some("a"));
    assert_eq!(writes[0][0].id, None);
}

#[tokio::test]
async fn unchanged_item_is_skipped_but_still_emitted() {
    let session = FakeSession::new("posts")
        .with_items(vec![remote_item("1", "first", json!({"title": "X"}))]);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(Some("1"), None, json!({"title": "X"}))],
        SyncMode::DiffChangedOnly,
    );

    let (report, _) = run(&session, &request).await;

    assert!(session.writes().is_empty(), "no-op items must not trigger a write");
    assert_eq!(report.skipped, 1);
    assert_eq!(report.written, 0);
    assert_eq!(report.records[0].framer_item_id, "1");
    assert!(report.records[0].has_framer_id);
    assert_eq!(report.records[0].name, "first");
}

#[tokio::test]
async fn empty_write_response_is_recovered_by_slug() {
    let session = FakeSession::new("posts").with_write_mode(WriteMode::Silent);
    let request = ReconcileRequest::new(
        "posts",
        vec![
            desired(None, Some("alpha"), json!({"title": "A"})),
            desired(None, Some("Beta"), json!({"title": "B"})),
        ],
        SyncMode::DiffChangedOnly,
    );

    let (report, sleeper) = run(&session, &request).await;

    assert_eq!(report.resolution_attempts, 1);
    assert!(report.unresolved.is_empty());
    assert!(report.records.iter().all(|record| record.has_framer_id));
    assert_eq!(report.records[0].framer_item_id, "1");
    assert_eq!(report.records[1].framer_item_id, "2");
    assert_eq!(sleeper.calls(), 0, "the first resolution attempt does not wait");
}

#[tokio::test]
async fn permanent_under_resolution_is_soft() {
    let session = FakeSession::new("posts").with_write_mode(WriteMode::Lost);
    let request = ReconcileRequest::new(
        "posts",
        vec![
            desired(None, Some("a"), json!({"title": "A"})),
            desired(Some("x9"), Some("c"), json!({"title": "C"})),
        ],
        SyncMode::DiffChangedOnly,
    );

    let (report, sleeper) = run(&session, &request).await;

    assert_eq!(report.resolution_attempts, 4);
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_millis(350), Duration::from_millis(700), Duration::from_millis(1050)]
    );
    assert_eq!(session.fetch_calls(), 5);
    assert_eq!(report.unresolved, vec![0, 1]);

    assert_eq!(report.records[0].framer_item_id, "");
    assert!(!report.records[0].has_framer_id);
    // The requested id is still reported even though it was never confirmed.
    assert_eq!(report.records[1].framer_item_id, "x9");
    assert!(!report.records[1].has_framer_id);
}

#[tokio::test]
async fn stops_as_soon_as_items_become_visible() {
    let session = FakeSession::new("posts")
        .with_write_mode(WriteMode::Silent)
        .with_stale_reads(2);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("late"), json!({"title": "L"}))],
        SyncMode::DiffChangedOnly,
    );

    let (report, sleeper) = run(&session, &request).await;

    assert_eq!(report.resolution_attempts, 3);
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(350), Duration::from_millis(700)]);
    assert!(report.records[0].has_framer_id);
}

#[tokio::test]
async fn partial_confirmation_is_completed_by_refetch() {
    let session = FakeSession::new("posts").with_write_mode(WriteMode::Partial(1));
    let request = ReconcileRequest::new(
        "posts",
        vec![
            desired(None, Some("a"), json!({})),
            desired(None, Some("b"), json!({})),
            desired(None, Some("c"), json!({})),
        ],
        SyncMode::DiffChangedOnly,
    );

    let (report, _) = run(&session, &request).await;

    assert_eq!(report.resolution_attempts, 1);
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn records_follow_input_order() {
    let session = FakeSession::new("posts")
        .with_items(vec![
            remote_item("1", "a", json!({"n": 0})),
            remote_item("2", "b", json!({"n": 0})),
            remote_item("3", "c", json!({"n": 0})),
        ])
        .with_write_mode(WriteMode::Silent);
    let request = ReconcileRequest::new(
        "posts",
        vec![
            desired(None, Some("c"), json!({"n": 1})),
            desired(None, Some("a"), json!({"n": 1})),
            desired(None, Some("b"), json!({"n": 1})),
        ],
        SyncMode::DiffChangedOnly,
    );

    let (report, _) = run(&session, &request).await;

    let ids: Vec<_> = report.records.iter().map(|record| record.framer_item_id.as_str()).collect();
    let names: Vec<_> = report.records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(ids, ["3", "1", "2"]);
    assert_eq!(names, ["c", "a", "b"]);
}

#[tokio::test]
async fn slug_match_updates_in_place() {
    let session = FakeSession::new("posts")
        .with_items(vec![remote_item("7", "about", json!({"title": "Old"}))]);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("ABOUT"), json!({"title": "New"}))],
        SyncMode::DiffChangedOnly,
    );

    let (report, _) = run(&session, &request).await;

    let change = &session.writes()[0][0];
    assert_eq!(change.id.as_deref(), Some("7"));
    assert_eq!(change.field_data, Some(support::fields(json!({"title": "New"}))));
    assert_eq!(session.items().len(), 1, "no duplicate item may be created");
    assert_eq!(report.records[0].framer_item_id, "7");
}

#[tokio::test]
async fn replace_mode_sends_everything_without_diff_read() {
    let session = FakeSession::new("posts")
        .with_items(vec![remote_item("1", "a", json!({"title": "X", "body": "B"}))]);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(Some("1"), Some("a"), json!({"title": "X", "body": "B"}))],
        SyncMode::ReplaceFull,
    );

    let (report, _) = run(&session, &request).await;

    assert_eq!(session.fetch_calls(), 0);
    assert_eq!(report.written, 1);
    let change = &session.writes()[0][0];
    assert_eq!(change.field_data, Some(support::fields(json!({"title": "X", "body": "B"}))));
}

#[tokio::test]
async fn keyless_items_are_not_chased() {
    let session = FakeSession::new("posts").with_write_mode(WriteMode::Lost);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, None, json!({"title": "Anonymous"}))],
        SyncMode::DiffChangedOnly,
    );

    let (report, sleeper) = run(&session, &request).await;

    assert_eq!(report.resolution_attempts, 0);
    assert_eq!(sleeper.calls(), 0);
    assert_eq!(report.unresolved, vec![0]);
    assert!(!report.records[0].has_framer_id);
}

#[tokio::test]
async fn caller_metadata_is_echoed_and_overrides_defaults() {
    let session = FakeSession::new("posts")
        .with_items(vec![remote_item("1", "a", json!({"title": "X"}))]);
    let request = ReconcileRequest::from_json(
        "posts",
        &json!([{
            "id": "1",
            "fieldData": {"title": "X"},
            "notionPageId": "notion-1",
            "contentHash": "hash-new",
            "hasFramerId": false,
            "isChanged": false
        }]),
        SyncMode::DiffChangedOnly,
        &json!({"last_sync_hash": "hash-old", "title": "From host"}),
    )
    .unwrap();

    let (report, _) = run(&session, &request).await;

    let record = &report.records[0];
    assert_eq!(record.notion_page_id, "notion-1");
    assert_eq!(record.content_hash, "hash-new");
    assert_eq!(record.last_sync_hash, "hash-old");
    assert_eq!(record.name, "From host");
    assert_eq!(record.framer_item_id, "1");
    assert!(!record.has_framer_id);
    assert!(!record.is_changed);
}

#[tokio::test]
async fn write_failure_aborts_the_pass() {
    let session =
        FakeSession::new("posts").with_write_mode(WriteMode::Fail("502 from upstream".into()));
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({}))],
        SyncMode::DiffChangedOnly,
    );

    let err = coordinator(&session, &RecordingSleeper::new())
        .reconcile(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, FramesyncError::Transport("502 from upstream".into()));
    assert_eq!(session.writes().len(), 1, "transport failures are not retried");
}

#[tokio::test]
async fn refetch_failure_aborts_the_pass() {
    let session = FakeSession::new("posts")
        .with_write_mode(WriteMode::Silent)
        .failing_fetch(2);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({}))],
        SyncMode::DiffChangedOnly,
    );

    let result = coordinator(&session, &RecordingSleeper::new())
        .reconcile(&request, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(FramesyncError::Transport(_))));
}

#[tokio::test]
async fn diff_read_failure_prevents_write() {
    let session = FakeSession::new("posts").failing_fetch(1);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({}))],
        SyncMode::DiffChangedOnly,
    );

    let result = coordinator(&session, &RecordingSleeper::new())
        .reconcile(&request, &CancellationToken::new())
        .await;

    assert!(result.is_err());
    assert!(session.writes().is_empty());
}

#[tokio::test]
async fn cancelled_before_start_makes_no_calls() {
    let session = FakeSession::new("posts");
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({}))],
        SyncMode::DiffChangedOnly,
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = coordinator(&session, &RecordingSleeper::new())
        .reconcile(&request, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, FramesyncError::Cancelled(_)));
    assert_eq!(session.fetch_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_during_write_is_an_error() {
    let session = FakeSession::new("posts").with_write_mode(WriteMode::Hang);
    let request = ReconcileRequest::new(
        "posts",
        vec![desired(None, Some("a"), json!({}))],
        SyncMode::DiffChangedOnly,
    );
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        trigger.cancel();
    });

    let err = coordinator(&session, &RecordingSleeper::new())
        .reconcile(&request, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, FramesyncError::Cancelled("reconciliation cancelled during writing".into()));
}

#[tokio::test]
async fn cancelled_during_resolution_emits_best_effort_records() {
    let session = FakeSession::new("posts")
        .with_items(vec![remote_item("1", "kept", json!({"title": "Same"}))])
        .with_write_mode(WriteMode::Lost);
    let request = ReconcileRequest::new(
        "posts",
        vec![
            desired(Some("1"), None, json!({"title": "Same"})),
            desired(None, Some("pending"), json!({"title": "New"})),
        ],
        SyncMode::DiffChangedOnly,
    );
    let cancel = CancellationToken::new();
    let sleeper = CancellingSleeper(cancel.clone());

    let report = SyncCoordinator::new(Arc::new(session.clone()), Arc::new(sleeper))
        .reconcile(&request, &cancel)
        .await
        .expect("cancellation while resolving still yields records");

    assert!(report.cancelled);
    assert_eq!(report.resolution_attempts, 2);
    assert_eq!(report.records.len(), 2);
    assert!(report.records[0].has_framer_id);
    assert!(!report.records[1].has_framer_id);
    assert_eq!(report.unresolved, vec![1]);
}
