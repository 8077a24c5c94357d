// src/presentation/http/controllers/crates.rs
use crate::presentation::http::error::{IntoPageResult, PageResult};
use crate::presentation::http::extractors::MaybeUser;
use crate::presentation::http::state::HttpState;
use crate::presentation::http::views;
use axum::{Extension, extract::Path, response::Html};

/// Handles `GET /crates/{crate_id}`.
pub async fn show(
    Extension(state): Extension<HttpState>,
    MaybeUser(viewer): MaybeUser,
    Path(crate_id): Path<String>,
) -> PageResult<Html<String>> {
    let krate = state
        .services
        .crate_queries
        .get_crate(&crate_id)
        .await
        .into_page(&viewer)?;
    let versions = state
        .services
        .crate_queries
        .versions(&crate_id)
        .await
        .into_page(&viewer)?;
    let now = state.services.clock().now();
    Ok(Html(views::crate_page(&krate, &versions, now, viewer.as_ref())))
}
