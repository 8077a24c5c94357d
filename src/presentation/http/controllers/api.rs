// src/presentation/http/controllers/api.rs
//! JSON endpoints under `/api/v1`.

use super::keywords::KeywordListParams;
use super::search::SearchParams;
use crate::application::{
    dto::{CrateDto, ExtraDownloadDto, KeywordDto, PageRequest, SummaryDto, UserDto, VersionDownloadDto, VersionDto},
    error::ApplicationError,
    queries::SearchCratesQuery,
};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult, MUST_LOGIN};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query, rejection::QueryRejection},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct CrateListResponse {
    pub crates: Vec<CrateDto>,
    pub meta: ListMeta,
}

#[derive(Debug, Serialize)]
pub struct CrateResponse {
    #[serde(rename = "crate")]
    pub krate: CrateDto,
}

#[derive(Debug, Serialize)]
pub struct VersionListResponse {
    pub versions: Vec<VersionDto>,
}

#[derive(Debug, Serialize)]
pub struct DownloadsMeta {
    pub extra_downloads: Vec<ExtraDownloadDto>,
}

#[derive(Debug, Serialize)]
pub struct DownloadsResponse {
    pub version_downloads: Vec<VersionDownloadDto>,
    pub meta: DownloadsMeta,
}

#[derive(Debug, Serialize)]
pub struct KeywordListResponse {
    pub keywords: Vec<KeywordDto>,
    pub meta: ListMeta,
}

#[derive(Debug, Serialize)]
pub struct KeywordResponse {
    pub keyword: KeywordDto,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserDto,
}

fn bad_query(rejection: QueryRejection) -> HttpError {
    HttpError::from_error(ApplicationError::validation(rejection.body_text()))
}

pub async fn list_crates(
    Extension(state): Extension<HttpState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> HttpResult<Json<CrateListResponse>> {
    let Query(params) = params.map_err(bad_query)?;
    let page = state
        .services
        .crate_queries
        .search(SearchCratesQuery {
            query: params.q.unwrap_or_default(),
            page: PageRequest {
                page: params.page,
                per_page: params.per_page,
            },
        })
        .await
        .into_http()?;

    Ok(Json(CrateListResponse {
        crates: page.items,
        meta: ListMeta { total: page.total },
    }))
}

pub async fn get_crate(
    Extension(state): Extension<HttpState>,
    Path(crate_id): Path<String>,
) -> HttpResult<Json<CrateResponse>> {
    let krate = state
        .services
        .crate_queries
        .get_crate(&crate_id)
        .await
        .into_http()?;
    Ok(Json(CrateResponse { krate }))
}

pub async fn crate_versions(
    Extension(state): Extension<HttpState>,
    Path(crate_id): Path<String>,
) -> HttpResult<Json<VersionListResponse>> {
    let versions = state
        .services
        .crate_queries
        .versions(&crate_id)
        .await
        .into_http()?;
    Ok(Json(VersionListResponse { versions }))
}

pub async fn crate_downloads(
    Extension(state): Extension<HttpState>,
    Path(crate_id): Path<String>,
) -> HttpResult<Json<DownloadsResponse>> {
    let now = state.services.clock().now();
    let downloads = state
        .services
        .crate_queries
        .downloads(&crate_id, now)
        .await
        .into_http()?;
    Ok(Json(DownloadsResponse {
        version_downloads: downloads.version_downloads,
        meta: DownloadsMeta {
            extra_downloads: downloads.extra_downloads,
        },
    }))
}

pub async fn list_keywords(
    Extension(state): Extension<HttpState>,
    params: Result<Query<KeywordListParams>, QueryRejection>,
) -> HttpResult<Json<KeywordListResponse>> {
    let Query(params) = params.map_err(bad_query)?;
    let page = state
        .services
        .keyword_queries
        .list_keywords(params.into_query())
        .await
        .into_http()?;

    Ok(Json(KeywordListResponse {
        keywords: page.items,
        meta: ListMeta { total: page.total },
    }))
}

pub async fn get_keyword(
    Extension(state): Extension<HttpState>,
    Path(keyword_id): Path<String>,
) -> HttpResult<Json<KeywordResponse>> {
    let keyword = state
        .services
        .keyword_queries
        .get_keyword(&keyword_id)
        .await
        .into_http()?;
    Ok(Json(KeywordResponse { keyword }))
}

/// The backend's own notion of the current user; window storage plays no part.
pub async fn me(Extension(state): Extension<HttpState>) -> HttpResult<Json<MeResponse>> {
    let user = state
        .services
        .session_queries
        .backend_user()
        .await
        .into_http()?
        .ok_or_else(|| HttpError::from_error(ApplicationError::forbidden(MUST_LOGIN)))?;
    Ok(Json(MeResponse { user }))
}

pub async fn summary(Extension(state): Extension<HttpState>) -> HttpResult<Json<SummaryDto>> {
    let summary = state.services.crate_queries.summary().await.into_http()?;
    Ok(Json(summary))
}
