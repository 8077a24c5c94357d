// tests/api_e2e.rs
use axum::http::StatusCode;
use registry_frontend::testing::{CrateFixture, HarnessResult, TestContext, VersionFixture};

mod support;
use support::{date_before_freeze, error_detail, get_json};

async fn health_and_unknown_api_paths(cx: &mut TestContext) -> HarnessResult<()> {
    let app = cx.application()?;

    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, json) = get_json(&app, "/api/v1/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_detail(&json), "Not Found");

    let (status, json) = get_json(&app, "/api/v1/crates/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_detail(&json), "Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_api_paths_return_json_404() {
    support::application_test(|cx| Box::pin(health_and_unknown_api_paths(cx))).await;
}

async fn crate_endpoints(cx: &mut TestContext) -> HarnessResult<()> {
    let server = cx.server()?;
    server.create_crate(CrateFixture::new("serde").downloads(10).keyword("encoding"))?;
    server.create_crate(CrateFixture::new("serde_json").downloads(5).keyword("encoding"))?;
    server.create_crate(CrateFixture::new("tokio").downloads(7).keyword("async"))?;
    let app = cx.application()?;

    let (status, json) = get_json(&app, "/api/v1/crates?q=serde&per_page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 2);
    assert_eq!(json["crates"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["crates"][0]["name"], "serde");
    assert_eq!(json["crates"][0]["updated_at"], "2017-11-20T11:00:00Z");

    let (status, json) = get_json(&app, "/api/v1/crates/tokio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["crate"]["id"], "tokio");
    assert_eq!(json["crate"]["keywords"][0], "async");

    let (status, json) = get_json(&app, "/api/v1/crates?per_page=1000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_detail(&json).is_empty());

    let (status, json) = get_json(&app, "/api/v1/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_crates"], 3);
    assert_eq!(json["num_downloads"], 22);
    assert_eq!(json["most_downloaded"][0]["name"], "serde");
    Ok(())
}

#[tokio::test]
async fn e2e_crate_endpoints_serve_fixtures() {
    support::application_test(|cx| Box::pin(crate_endpoints(cx))).await;
}

async fn version_endpoints(cx: &mut TestContext) -> HarnessResult<()> {
    let mut fixture = CrateFixture::new("nanomsg").downloads(100);
    for minor in 0..7 {
        fixture = fixture.version(
            VersionFixture::new(format!("0.{minor}.0"))
                .downloads(10)
                .daily(date_before_freeze(1), minor + 1)
                .daily(date_before_freeze(2), 1)
                .daily(date_before_freeze(120), 50),
        );
    }
    fixture = fixture.version(VersionFixture::new("0.7.0-rc.1").yanked());
    cx.server()?.create_crate(fixture)?;
    let app = cx.application()?;

    let (status, json) = get_json(&app, "/api/v1/crates/nanomsg/versions").await;
    assert_eq!(status, StatusCode::OK);
    let versions = json["versions"].as_array().cloned().unwrap_or_default();
    assert_eq!(versions.len(), 8);
    assert_eq!(versions[0]["num"], "0.7.0-rc.1");
    assert_eq!(versions[0]["yanked"], true);
    assert_eq!(versions[1]["num"], "0.6.0");
    assert_eq!(versions[1]["crate"], "nanomsg");
    assert_eq!(versions[1]["downloads"], 10);
    assert_eq!(versions[1]["created_at"], "2017-11-20T11:00:00Z");

    let (_, json) = get_json(&app, "/api/v1/crates/nanomsg").await;
    assert_eq!(json["crate"]["max_version"], "0.6.0");

    // the newest five versions are 0.7.0-rc.1 and 0.6.0 through 0.3.0
    let (status, json) = get_json(&app, "/api/v1/crates/nanomsg/downloads").await;
    assert_eq!(status, StatusCode::OK);
    let daily = json["version_downloads"].as_array().cloned().unwrap_or_default();
    assert_eq!(daily.len(), 8);
    assert_eq!(daily[0]["date"], "2017-11-18");
    assert_eq!(daily[7]["date"], "2017-11-19");
    assert!(daily.iter().all(|d| d["version"] != "0.2.0"));
    assert_eq!(
        json["meta"]["extra_downloads"],
        serde_json::json!([
            { "date": "2017-11-18", "downloads": 3 },
            { "date": "2017-11-19", "downloads": 6 },
        ])
    );

    for path in ["/api/v1/crates/missing/versions", "/api/v1/crates/missing/downloads"] {
        let (status, json) = get_json(&app, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_detail(&json), "Not Found");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_version_endpoints_report_versions_and_downloads() {
    support::application_test(|cx| Box::pin(version_endpoints(cx))).await;
}

async fn keyword_endpoints(cx: &mut TestContext) -> HarnessResult<()> {
    let server = cx.server()?;
    server.create_crate(CrateFixture::new("serde").keyword("encoding"))?;
    server.create_crate(CrateFixture::new("bincode").keyword("encoding"))?;
    server.create_keyword("async")?;
    let app = cx.application()?;

    let (status, json) = get_json(&app, "/api/v1/keywords?sort=crates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 2);
    assert_eq!(json["keywords"][0]["keyword"], "encoding");
    assert_eq!(json["keywords"][0]["crates_cnt"], 2);

    let (status, json) = get_json(&app, "/api/v1/keywords").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keywords"][0]["keyword"], "async");

    let (status, json) = get_json(&app, "/api/v1/keywords/async").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keyword"]["crates_cnt"], 0);

    let (status, _) = get_json(&app, "/api/v1/keywords/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_keyword_endpoints_list_and_find() {
    support::application_test(|cx| Box::pin(keyword_endpoints(cx))).await;
}

async fn me_endpoint(cx: &mut TestContext) -> HarnessResult<()> {
    let app = cx.application()?;

    let (status, json) = get_json(&app, "/api/v1/me").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_detail(&json), "must be logged in to perform that action");

    let user = cx.server()?.create_user("the_user", Some("The User"))?;
    cx.authenticate_as(&user)?;

    let (status, json) = get_json(&app, "/api/v1/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["login"], "the_user");
    assert_eq!(json["user"]["id"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_me_requires_a_backend_session() {
    support::application_test(|cx| Box::pin(me_endpoint(cx))).await;
}
