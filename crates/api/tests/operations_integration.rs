//! End-to-end operation dispatch against a mock Framer API.

mod support;

use framesync_domain::FramesyncError;
use framesync_lib::{execute, execute_batch, BatchEntry, Operation, OperationRequest};
use serde_json::json;
use support::{context, mount_collection, mount_sessions, SESSION};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn upsert(collection_id: &str, items: serde_json::Value) -> OperationRequest {
    OperationRequest {
        collection_id: collection_id.into(),
        items: items.to_string(),
        ..OperationRequest::new(Operation::UpsertCollectionItems)
    }
}

#[tokio::test]
async fn project_info_is_wrapped_and_session_released() {
    let server = MockServer::start().await;
    mount_sessions(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .and(header("x-framer-session", SESSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Blog"})))
        .expect(1)
        .mount(&server)
        .await;
    let (ctx, _) = context(&server);

    let output = execute(&ctx, &OperationRequest::new(Operation::GetProjectInfo), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({"operation": "getProjectInfo", "success": true, "result": {"id": "p1", "name": "Blog"}})
    );
}

#[tokio::test]
async fn blank_custom_url_fails_before_connecting() {
    let server = MockServer::start().await;
    let (ctx, _) = context(&server);
    let request = OperationRequest {
        custom_url: Some("   ".into()),
        ..OperationRequest::new(Operation::GetCollections)
    };

    let err = execute(&ctx, &request, &CancellationToken::new()).await.unwrap_err();

    assert_eq!(
        err,
        FramesyncError::Config("Framer URL is empty. Set it in credentials or custom URL".into())
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn custom_url_is_sent_when_opening_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/sessions"))
        .and(body_json(json!({"projectUrl": "https://framer.com/projects/Other--x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionId": SESSION})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/sessions/{SESSION}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c1", "name": "Posts", "managedBy": "user", "readonly": false}
        ])))
        .mount(&server)
        .await;
    let (ctx, _) = context(&server);
    let request = OperationRequest {
        custom_url: Some("https://framer.com/projects/Other--x".into()),
        ..OperationRequest::new(Operation::GetCollections)
    };

    let output = execute(&ctx, &request, &CancellationToken::new()).await.unwrap();

    assert_eq!(output.result, json!([{"id": "c1", "name": "Posts", "managedBy": "user"}]));
}

#[tokio::test]
async fn malformed_items_fail_before_connecting() {
    let server = MockServer::start().await;
    let (ctx, _) = context(&server);
    let request = OperationRequest { items: "[{".into(), ..upsert("c1", json!([])) };

    let err = execute(&ctx, &request, &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FramesyncError::Precondition(ref msg) if msg.starts_with("Items JSON is invalid")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_collection_still_releases_the_session() {
    let server = MockServer::start().await;
    mount_sessions(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let (ctx, _) = context(&server);

    let err = execute(&ctx, &upsert("missing", json!([{"slug": "a"}])), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, FramesyncError::NotFound("Collection not found for ID: missing".into()));
}

#[tokio::test]
async fn upsert_returns_sync_records_with_recovered_ids() {
    let server = MockServer::start().await;
    mount_sessions(&server, 1).await;
    mount_collection(&server, "c1").await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/c1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/collections/c1/items"))
        .and(body_json(json!({"items": [{"slug": "hello", "fieldData": {"title": "Hi"}}]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/c1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "new-1", "slug": "hello", "draft": false, "fieldData": {"title": "Hi"}}]
        })))
        .mount(&server)
        .await;
    let (ctx, sleeper) = context(&server);
    let request = OperationRequest {
        input: json!({"notionPageId": "page-1", "contentHash": "h1"}),
        ..upsert("c1", json!([{"slug": "hello", "fieldData": {"title": "Hi"}}]))
    };

    let output = execute(&ctx, &request, &CancellationToken::new()).await.unwrap();

    assert_eq!(
        output.result,
        json!([{
            "notionPageId": "page-1",
            "framerItemId": "new-1",
            "lastSyncHash": "",
            "contentHash": "h1",
            "hasFramerId": true,
            "isChanged": true,
            "name": "hello"
        }])
    );
    assert_eq!(sleeper.calls(), 0);
}

#[tokio::test]
async fn batch_continues_past_failures_when_asked() {
    let server = MockServer::start().await;
    mount_sessions(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/v1/project/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployment": {"id": "dep-1", "createdAt": "t0", "updatedAt": "t0"},
            "hostnames": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let (ctx, _) = context(&server);
    let requests = vec![
        OperationRequest::new(Operation::RemoveCollectionItems),
        OperationRequest::new(Operation::GetProjectInfo),
        OperationRequest::new(Operation::Publish),
    ];

    let entries = execute_batch(&ctx, &requests, true, &CancellationToken::new()).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(
        serde_json::to_value(&entries[0]).unwrap(),
        json!({
            "success": false,
            "error": "Collection ID is required for Remove Collection Items operation"
        })
    );
    assert!(matches!(&entries[1], BatchEntry::Failed(failed) if failed.error.starts_with("Transport error")));
    assert!(entries[2].is_success());
}

#[tokio::test]
async fn batch_stops_at_first_failure_by_default() {
    let server = MockServer::start().await;
    let (ctx, _) = context(&server);
    let requests = vec![
        OperationRequest::new(Operation::SetupCollectionFields),
        OperationRequest::new(Operation::Publish),
    ];

    let err = execute_batch(&ctx, &requests, false, &CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.kind(), "precondition");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_batch_runs_nothing() {
    let server = MockServer::start().await;
    let (ctx, _) = context(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = execute_batch(&ctx, &[OperationRequest::new(Operation::Publish)], true, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, FramesyncError::Cancelled(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
