// src/presentation/http/controllers/search.rs
use crate::application::{
    dto::PageRequest, error::ApplicationError, queries::SearchCratesQuery,
};
use crate::presentation::http::error::{IntoPageResult, PageError, PageResult};
use crate::presentation::http::extractors::MaybeUser;
use crate::presentation::http::state::HttpState;
use crate::presentation::http::views;
use axum::{
    Extension,
    extract::{Query, rejection::QueryRejection},
    response::Html,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Handles `GET /search?q=…`. The query is echoed exactly as submitted.
pub async fn search(
    Extension(state): Extension<HttpState>,
    MaybeUser(viewer): MaybeUser,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> PageResult<Html<String>> {
    let Query(params) = params.map_err(|rejection| {
        PageError::from_error(ApplicationError::validation(rejection.body_text()), viewer.clone())
    })?;

    let query = params.q.unwrap_or_default();
    let results = state
        .services
        .crate_queries
        .search(SearchCratesQuery {
            query: query.clone(),
            page: PageRequest {
                page: params.page,
                per_page: params.per_page,
            },
        })
        .await
        .into_page(&viewer)?;

    let now = state.services.clock().now();
    Ok(Html(views::search_page(&query, &results, now, viewer.as_ref())))
}
