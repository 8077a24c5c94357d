// src/presentation/http/views.rs
//! Server-rendered HTML. Elements tests look for carry `data-test-*` markers.

use crate::application::{
    dto::{CrateDto, KeywordDto, Page, SummaryDto, UserDto, VersionDto},
    format::{format_downloads, time_ago},
};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

const SITE_NAME: &str = "Crate Registry";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, viewer: Option<&UserDto>, query: &str, body: &str) -> String {
    let session = match viewer {
        Some(user) => format!(
            r#"<a href="/me" data-test-user-menu>{}</a>"#,
            escape(user.name.as_deref().unwrap_or(&user.login))
        ),
        None => r#"<a href="/me" data-test-login-link>Log in with GitHub</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {SITE_NAME}</title>
</head>
<body>
<header data-test-header-nav>
<a href="/" data-test-home-link>{SITE_NAME}</a>
<form action="/search" method="get" data-test-search-form>
<input type="text" name="q" value="{query}" placeholder="Search crates" data-test-search-input>
</form>
<nav>
<a href="/keywords" data-test-keywords-link>Keywords</a>
{session}
</nav>
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        query = escape(query),
    )
}

fn crate_row(krate: &CrateDto, now: DateTime<Utc>) -> String {
    format!(
        r#"<li data-test-crate-row>
<a href="/crates/{name}" data-test-crate-link>{name}</a>
<p data-test-description>{description}</p>
<span data-test-downloads>All-Time: {downloads}</span>
<span data-test-updated-at>Updated {updated}</span>
</li>
"#,
        name = escape(&krate.name),
        description = escape(krate.description.as_deref().unwrap_or("")),
        downloads = format_downloads(krate.downloads),
        updated = time_ago(krate.updated_at, now),
    )
}

pub fn not_found_page(viewer: Option<&UserDto>) -> String {
    let body = r#"<section data-test-404-page>
<h1 data-test-404-header>Page not found</h1>
<p>Oops, this page does not exist. Perhaps a search helps?</p>
<form action="/search" method="get" data-test-404-search-form>
<input type="text" name="q" placeholder="Search crates" data-test-404-search-input>
<button type="submit" data-test-404-search-button>Search</button>
</form>
<a href="/" data-test-go-back>Go back home</a>
</section>"#;
    layout("Page Not Found", viewer, "", body)
}

pub fn error_page(status: StatusCode, message: &str, viewer: Option<&UserDto>) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<section data-test-error-page>
<h1 data-test-error-status>{code} {reason}</h1>
<p data-test-error-message>{message}</p>
<a href="/" data-test-go-back>Go back home</a>
</section>"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout(reason, viewer, "", &body)
}

pub fn index_page(summary: &SummaryDto, now: DateTime<Utc>, viewer: Option<&UserDto>) -> String {
    let mut body = format!(
        r#"<section data-test-summary>
<h1>The Rust community's crate registry</h1>
<p><span data-test-total-downloads>{downloads}</span> Downloads</p>
<p><span data-test-total-crates>{crates}</span> Crates in stock</p>
</section>
"#,
        downloads = format_downloads(summary.num_downloads),
        crates = format_downloads(summary.num_crates),
    );

    body.push_str("<section>\n<h2>Most Downloaded</h2>\n<ul data-test-most-downloaded>\n");
    for krate in &summary.most_downloaded {
        body.push_str(&crate_row(krate, now));
    }
    body.push_str("</ul>\n</section>\n<section>\n<h2>Just Updated</h2>\n<ul data-test-just-updated>\n");
    for krate in &summary.just_updated {
        body.push_str(&crate_row(krate, now));
    }
    body.push_str("</ul>\n</section>");

    layout(SITE_NAME, viewer, "", &body)
}

pub fn search_page(
    query: &str,
    results: &Page<CrateDto>,
    now: DateTime<Utc>,
    viewer: Option<&UserDto>,
) -> String {
    let listing_all = query.trim().is_empty();
    let heading = if listing_all {
        "All Crates".to_string()
    } else {
        format!("Search Results for '{query}'")
    };

    let mut body = format!("<h1 data-test-header>{}</h1>\n", escape(&heading));
    match results.range() {
        Some((first, last)) => {
            let _ = writeln!(
                body,
                "<p data-test-search-nav>Displaying {first}-{last} of {} total results</p>",
                results.total
            );
            body.push_str("<ul data-test-crate-list>\n");
            for krate in &results.items {
                body.push_str(&crate_row(krate, now));
            }
            body.push_str("</ul>");
        }
        None => {
            let _ = write!(
                body,
                "<p data-test-no-results>0 crates found. Get started and create your own.</p>"
            );
        }
    }

    let title = if listing_all {
        "Search".to_string()
    } else {
        format!("Search Results for '{query}'")
    };
    layout(&title, viewer, query, &body)
}

pub fn crate_page(
    krate: &CrateDto,
    versions: &[VersionDto],
    now: DateTime<Utc>,
    viewer: Option<&UserDto>,
) -> String {
    let mut version_rows = String::new();
    for version in versions {
        let _ = writeln!(
            version_rows,
            r#"<li data-test-version><span data-test-version-num>{num}</span>{yanked} <span data-test-version-created-at>{created}</span></li>"#,
            num = escape(&version.num),
            yanked = if version.yanked { r#" <span data-test-yanked>yanked</span>"# } else { "" },
            created = time_ago(version.created_at, now),
        );
    }
    let max_version = match &krate.max_version {
        Some(num) => format!("<p>Version <span data-test-max-version>{}</span></p>\n", escape(num)),
        None => String::new(),
    };

    let mut keywords = String::new();
    for keyword in &krate.keywords {
        let _ = writeln!(
            keywords,
            r#"<li><a href="/keywords/{kw}" data-test-keyword>{kw}</a></li>"#,
            kw = escape(keyword)
        );
    }

    let body = format!(
        r#"<article data-test-crate-page>
<h1 data-test-crate-name>{name}</h1>
<p data-test-crate-description>{description}</p>
{max_version}<p>Downloads: <span data-test-downloads>{downloads}</span></p>
<p data-test-updated-at>Updated {updated}</p>
<p data-test-created-at>Created {created}</p>
<ul data-test-keywords>
{keywords}</ul>
<h2>Versions</h2>
<ul data-test-versions>
{version_rows}</ul>
</article>"#,
        name = escape(&krate.name),
        description = escape(krate.description.as_deref().unwrap_or("")),
        downloads = format_downloads(krate.downloads),
        updated = time_ago(krate.updated_at, now),
        created = time_ago(krate.created_at, now),
    );
    layout(&krate.name, viewer, "", &body)
}

pub fn keywords_page(keywords: &Page<KeywordDto>, viewer: Option<&UserDto>) -> String {
    let mut body = String::from(
        r#"<h1 data-test-header>All Keywords</h1>
<p>Sort by <a href="/keywords?sort=alpha" data-test-sort-alpha>Alphabetical</a> or <a href="/keywords?sort=crates" data-test-sort-crates>Number of crates</a></p>
"#,
    );
    if keywords.items.is_empty() {
        body.push_str("<p data-test-no-results>No keywords yet.</p>");
    } else {
        body.push_str("<ul data-test-keyword-list>\n");
        for keyword in &keywords.items {
            let _ = writeln!(
                body,
                r#"<li data-test-keyword-row><a href="/keywords/{kw}" data-test-keyword>{kw}</a> <span data-test-crates-cnt>{count} crates</span></li>"#,
                kw = escape(&keyword.keyword),
                count = keyword.crates_cnt,
            );
        }
        body.push_str("</ul>");
    }
    layout("Keywords", viewer, "", &body)
}

pub fn keyword_page(
    keyword: &KeywordDto,
    crates: &[CrateDto],
    now: DateTime<Utc>,
    viewer: Option<&UserDto>,
) -> String {
    let mut body = format!(
        "<h1 data-test-keyword-header>Keyword: {}</h1>\n<ul data-test-crate-list>\n",
        escape(&keyword.keyword)
    );
    for krate in crates {
        body.push_str(&crate_row(krate, now));
    }
    body.push_str("</ul>");
    layout(&format!("Keyword: {}", keyword.keyword), viewer, "", &body)
}

pub fn me_page(user: &UserDto) -> String {
    let body = format!(
        r#"<section data-test-me-page>
<h1 data-test-username>{login}</h1>
<p data-test-name>{name}</p>
</section>"#,
        login = escape(&user.login),
        name = escape(user.name.as_deref().unwrap_or("")),
    );
    layout("Account Settings", Some(user), "", &body)
}
