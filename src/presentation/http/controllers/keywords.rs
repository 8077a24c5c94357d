// src/presentation/http/controllers/keywords.rs
use crate::application::{dto::PageRequest, error::ApplicationError, queries::ListKeywordsQuery};
use crate::domain::keyword::KeywordSort;
use crate::presentation::http::error::{IntoPageResult, PageError, PageResult};
use crate::presentation::http::extractors::MaybeUser;
use crate::presentation::http::state::HttpState;
use crate::presentation::http::views;
use axum::{
    Extension,
    extract::{Path, Query, rejection::QueryRejection},
    response::Html,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct KeywordListParams {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl KeywordListParams {
    pub fn into_query(self) -> ListKeywordsQuery {
        ListKeywordsQuery {
            sort: KeywordSort::parse(self.sort.as_deref()),
            page: PageRequest {
                page: self.page,
                per_page: self.per_page,
            },
        }
    }
}

/// Handles `GET /keywords`.
pub async fn index(
    Extension(state): Extension<HttpState>,
    MaybeUser(viewer): MaybeUser,
    params: Result<Query<KeywordListParams>, QueryRejection>,
) -> PageResult<Html<String>> {
    let Query(params) = params.map_err(|rejection| {
        PageError::from_error(ApplicationError::validation(rejection.body_text()), viewer.clone())
    })?;

    let keywords = state
        .services
        .keyword_queries
        .list_keywords(params.into_query())
        .await
        .into_page(&viewer)?;
    Ok(Html(views::keywords_page(&keywords, viewer.as_ref())))
}

/// Handles `GET /keywords/{keyword_id}`.
pub async fn show(
    Extension(state): Extension<HttpState>,
    MaybeUser(viewer): MaybeUser,
    Path(keyword_id): Path<String>,
) -> PageResult<Html<String>> {
    let keyword = state
        .services
        .keyword_queries
        .get_keyword(&keyword_id)
        .await
        .into_page(&viewer)?;
    let crates = state
        .services
        .crate_queries
        .list_by_keyword(&keyword.keyword)
        .await
        .into_page(&viewer)?;
    let now = state.services.clock().now();
    Ok(Html(views::keyword_page(&keyword, &crates, now, viewer.as_ref())))
}
