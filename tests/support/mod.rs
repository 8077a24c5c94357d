// tests/support/mod.rs
// Shared by several integration test binaries; not every binary uses every
// helper.
#![allow(dead_code)]

use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use registry_frontend::testing::{
    HarnessResult, Hooks, TestContext, frozen_instant, setup_application_test,
};
use serde_json::Value;
use tower::util::ServiceExt as _;

/// The instant application tests are frozen at.
pub static FROZEN: Lazy<DateTime<Utc>> = Lazy::new(frozen_instant);

pub fn hours_before_freeze(hours: i64) -> DateTime<Utc> {
    *FROZEN - Duration::hours(hours)
}

pub fn days_before_freeze(days: i64) -> DateTime<Utc> {
    *FROZEN - Duration::days(days)
}

pub fn date_before_freeze(days: i64) -> NaiveDate {
    days_before_freeze(days).date_naive()
}

pub fn application_hooks() -> Hooks {
    let mut hooks = Hooks::new();
    setup_application_test(&mut hooks);
    hooks
}

/// Runs `body` as an application test and fails the test on any harness
/// error.
pub async fn application_test<F>(body: F) -> TestContext
where
    F: for<'a> FnOnce(
        &'a mut TestContext,
    ) -> futures_util::future::LocalBoxFuture<'a, HarnessResult<()>>,
{
    let hooks = application_hooks();
    let mut cx = TestContext::default();
    if let Err(err) = hooks.run(&mut cx, body).await {
        panic!("application test failed: {err}");
    }
    cx
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let (parts, body_stream) = resp.into_parts();
    let ct = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(
        ct.starts_with("application/json"),
        "unexpected content-type for {uri}: {ct}"
    );
    let bytes = body::to_bytes(body_stream, 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).expect("expected valid json body");
    (status, json)
}

pub fn error_detail(json: &Value) -> &str {
    json["errors"][0]["detail"].as_str().unwrap_or("")
}
