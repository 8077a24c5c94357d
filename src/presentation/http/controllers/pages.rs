// src/presentation/http/controllers/pages.rs
use crate::application::error::ApplicationError;
use crate::presentation::http::error::{IntoPageResult, MUST_LOGIN, PageError, PageResult};
use crate::presentation::http::extractors::MaybeUser;
use crate::presentation::http::state::HttpState;
use crate::presentation::http::views;
use axum::{Extension, response::Html};

pub async fn index(
    Extension(state): Extension<HttpState>,
    MaybeUser(viewer): MaybeUser,
) -> PageResult<Html<String>> {
    let summary = state
        .services
        .crate_queries
        .summary()
        .await
        .into_page(&viewer)?;
    let now = state.services.clock().now();
    Ok(Html(views::index_page(&summary, now, viewer.as_ref())))
}

/// Account page of the logged-in user.
pub async fn me(MaybeUser(viewer): MaybeUser) -> PageResult<Html<String>> {
    match viewer {
        Some(user) => Ok(Html(views::me_page(&user))),
        None => Err(PageError::from_error(
            ApplicationError::forbidden(MUST_LOGIN),
            None,
        )),
    }
}
