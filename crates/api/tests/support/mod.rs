//! Shared test helpers for `framesync-app` integration tests.
//!
//! Operations run through the real HTTP adapter against a `wiremock`
//! server standing in for the Framer API.

#![allow(dead_code)]

use std::sync::Arc;

use framesync_common::testing::RecordingSleeper;
use framesync_domain::{Config, ConnectionConfig, HttpConfig, ReconcileConfig};
use framesync_lib::AppContext;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SESSION: &str = "sess-1";
pub const PROJECT_URL: &str = "https://framer.com/projects/Blog--abc";
pub const API_KEY: &str = "test-key";

pub fn config(server: &MockServer) -> Config {
    Config {
        connection: ConnectionConfig {
            project_url: PROJECT_URL.into(),
            api_key: API_KEY.into(),
            api_base_url: server.uri(),
        },
        http: HttpConfig { timeout_seconds: 5, max_attempts: 2, base_backoff_ms: 1 },
        reconcile: ReconcileConfig::default(),
    }
}

/// Context wired to `server`, with a sleeper that never waits.
pub fn context(server: &MockServer) -> (AppContext, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let ctx = AppContext::new_with_config(config(server))
        .expect("context")
        .with_sleeper(Arc::new(sleeper.clone()));
    (ctx, sleeper)
}

/// Expect `times` session opens and as many closes.
pub async fn mount_sessions(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/sessions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionId": SESSION})))
        .expect(times)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/sessions/{SESSION}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_collection(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/collections/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": id, "name": "Posts", "managedBy": "user"})),
        )
        .mount(server)
        .await;
}
