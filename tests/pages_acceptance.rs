// tests/pages_acceptance.rs
use axum::http::StatusCode;
use registry_frontend::testing::{
    CrateFixture, HarnessResult, MockServer, TestContext, VersionFixture,
};

mod support;

fn seed(server: &MockServer) -> HarnessResult<()> {
    server.create_crate(
        CrateFixture::new("rust")
            .description("The Rust programming language")
            .downloads(1_234)
            .keyword("language")
            .updated_at(support::hours_before_freeze(2)),
    )?;
    server.create_crate(
        CrateFixture::new("rustc-serialize")
            .description("Generic serialization for Rust")
            .downloads(2_500_000)
            .keyword("encoding")
            .updated_at(support::days_before_freeze(30)),
    )?;
    server.create_crate(
        CrateFixture::new("nanomsg")
            .description("Bindings for nanomsg, written in rust")
            .downloads(13)
            .keyword("network"),
    )?;
    server.create_crate(
        CrateFixture::new("serde")
            .description("Serialization framework")
            .downloads(9_000_000)
            .keyword("encoding")
            .updated_at(support::days_before_freeze(400)),
    )?;
    Ok(())
}

async fn search_results(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/search?q=rust").await?;

    browser.assert_text("[data-test-header]", "Search Results for 'rust'")?;
    browser.assert_text("[data-test-search-nav]", "Displaying 1-3 of 3 total results")?;
    assert_eq!(browser.count("[data-test-crate-row]")?, 3);

    // exact name match first, then by downloads
    browser.assert_text("[data-test-crate-row] [data-test-crate-link]", "rust")?;
    let links = browser.find_all("[data-test-crate-link]")?;
    assert_eq!(links.len(), 3);

    browser.assert_text("[data-test-crate-row] [data-test-downloads]", "All-Time: 1,234")?;
    browser.assert_text("[data-test-crate-row] [data-test-updated-at]", "Updated 2 hours ago")?;

    browser.click("[data-test-crate-link]").await?;
    assert_eq!(browser.current_url(), "/crates/rust");
    Ok(())
}

#[tokio::test]
async fn search_lists_matching_crates_with_relative_times() {
    support::application_test(|cx| Box::pin(search_results(cx))).await;
}

async fn search_without_results(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/").await?;
    browser.fill_in("[data-test-search-input]", "zzz")?;
    browser.trigger_event("[data-test-search-form]", "submit").await?;

    assert_eq!(browser.current_url(), "/search?q=zzz");
    browser.assert_exists("[data-test-no-results]")?;
    assert_eq!(browser.count("[data-test-crate-row]")?, 0);
    Ok(())
}

#[tokio::test]
async fn header_search_without_matches_shows_empty_state() {
    support::application_test(|cx| Box::pin(search_without_results(cx))).await;
}

async fn search_pagination(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/search?q=&page=2&per_page=3").await?;
    browser.assert_text("[data-test-header]", "All Crates")?;
    browser.assert_text("[data-test-search-nav]", "Displaying 4-4 of 4 total results")?;

    browser.visit("/search?q=rust&page=0").await?;
    assert_eq!(browser.status(), Some(StatusCode::BAD_REQUEST));
    browser.assert_exists("[data-test-error-page]")?;

    browser.visit("/search?q=rust&page=abc").await?;
    assert_eq!(browser.status(), Some(StatusCode::BAD_REQUEST));
    Ok(())
}

#[tokio::test]
async fn search_pages_through_all_crates() {
    support::application_test(|cx| Box::pin(search_pagination(cx))).await;
}

async fn blank_search(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/search?q=%20%20").await?;
    assert_eq!(browser.status(), Some(StatusCode::OK));
    browser.assert_text("[data-test-header]", "All Crates")?;
    assert_eq!(browser.count("[data-test-crate-row]")?, 4);
    Ok(())
}

#[tokio::test]
async fn whitespace_only_search_lists_all_crates() {
    support::application_test(|cx| Box::pin(blank_search(cx))).await;
}

async fn crate_details(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/crates/rustc-serialize").await?;
    assert_eq!(browser.status(), Some(StatusCode::OK));
    browser.assert_text("[data-test-crate-name]", "rustc-serialize")?;
    browser.assert_text("[data-test-crate-description]", "Generic serialization for Rust")?;
    browser.assert_text("[data-test-downloads]", "2,500,000")?;
    browser.assert_text("[data-test-updated-at]", "Updated a month ago")?;
    browser.assert_text("[data-test-created-at]", "Created a few seconds ago")?;

    browser.click("[data-test-keyword]").await?;
    assert_eq!(browser.current_url(), "/keywords/encoding");
    browser.assert_text("[data-test-keyword-header]", "Keyword: encoding")?;
    assert_eq!(browser.count("[data-test-crate-row]")?, 2);
    browser.assert_text("[data-test-crate-link]", "serde")?;
    Ok(())
}

#[tokio::test]
async fn crate_page_links_to_its_keywords() {
    support::application_test(|cx| Box::pin(crate_details(cx))).await;
}

async fn crate_versions(cx: &mut TestContext) -> HarnessResult<()> {
    cx.server()?.create_crate(
        CrateFixture::new("nanomsg")
            .downloads(13)
            .version(VersionFixture::new("0.5.0").created_at(support::days_before_freeze(30)))
            .version(VersionFixture::new("0.7.0").yanked().created_at(support::hours_before_freeze(2)))
            .version(VersionFixture::new("0.6.1").created_at(support::days_before_freeze(3))),
    )?;
    let mut browser = cx.browser()?;

    browser.visit("/crates/nanomsg").await?;
    assert_eq!(browser.status(), Some(StatusCode::OK));
    browser.assert_text("[data-test-max-version]", "0.6.1")?;
    assert_eq!(browser.count("[data-test-version]")?, 3);
    assert_eq!(browser.count("[data-test-yanked]")?, 1);
    browser.assert_text("[data-test-version]", "0.7.0 yanked 2 hours ago")?;

    let nums = browser.find_all("[data-test-version-num]")?;
    assert_eq!(nums.len(), 3);

    browser.visit("/crates/rust").await?;
    assert_eq!(browser.status(), Some(StatusCode::NOT_FOUND));
    Ok(())
}

#[tokio::test]
async fn crate_page_lists_versions_newest_first() {
    support::application_test(|cx| Box::pin(crate_versions(cx))).await;
}

async fn crate_without_versions(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/crates/serde").await?;
    browser.assert_exists("[data-test-versions]")?;
    assert_eq!(browser.count("[data-test-version]")?, 0);
    assert!(!browser.exists("[data-test-max-version]")?);
    Ok(())
}

#[tokio::test]
async fn crate_page_without_versions_has_an_empty_list() {
    support::application_test(|cx| Box::pin(crate_without_versions(cx))).await;
}

async fn keyword_listing(cx: &mut TestContext) -> HarnessResult<()> {
    let server = cx.server()?;
    seed(&server)?;
    server.create_keyword("unused")?;
    let mut browser = cx.browser()?;

    browser.visit("/keywords").await?;
    assert_eq!(browser.count("[data-test-keyword-row]")?, 4);
    browser.assert_text("[data-test-keyword]", "encoding")?;

    browser.click("[data-test-sort-crates]").await?;
    assert_eq!(browser.current_url(), "/keywords?sort=crates");
    browser.assert_text("[data-test-keyword-row]", "encoding 2 crates")?;
    Ok(())
}

#[tokio::test]
async fn keywords_can_be_sorted_by_crate_count() {
    support::application_test(|cx| Box::pin(keyword_listing(cx))).await;
}

async fn front_page(cx: &mut TestContext) -> HarnessResult<()> {
    seed(&*cx.server()?)?;
    let mut browser = cx.browser()?;

    browser.visit("/").await?;
    browser.assert_text("[data-test-total-crates]", "4")?;
    browser.assert_text("[data-test-total-downloads]", "11,501,247")?;
    browser.assert_text("[data-test-most-downloaded] [data-test-crate-link]", "serde")?;
    browser.assert_text("[data-test-just-updated] [data-test-crate-link]", "nanomsg")?;
    Ok(())
}

#[tokio::test]
async fn front_page_summarises_the_registry() {
    support::application_test(|cx| Box::pin(front_page(cx))).await;
}

async fn anonymous_account_page(cx: &mut TestContext) -> HarnessResult<()> {
    let mut browser = cx.browser()?;
    browser.visit("/").await?;
    browser.click("[data-test-login-link]").await?;

    assert_eq!(browser.current_url(), "/me");
    assert_eq!(browser.status(), Some(StatusCode::FORBIDDEN));
    browser.assert_text(
        "[data-test-error-message]",
        "must be logged in to perform that action",
    )?;
    Ok(())
}

#[tokio::test]
async fn anonymous_visitors_cannot_open_the_account_page() {
    support::application_test(|cx| Box::pin(anonymous_account_page(cx))).await;
}
