// src/presentation/http/controllers/not_found.rs
use crate::presentation::http::error::HttpError;
use crate::presentation::http::extractors::MaybeUser;
use crate::presentation::http::views;
use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

/// Fallback for every unmatched path.
///
/// API paths answer with the JSON error body; everything else renders the
/// not-found page, which is a regular page and not a failure of the request.
pub async fn fallback(uri: Uri, MaybeUser(viewer): MaybeUser) -> Response {
    if uri.path() == "/api" || uri.path().starts_with("/api/") {
        return HttpError::not_found().into_response();
    }

    tracing::debug!(path = %uri.path(), "no route matched");
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found_page(viewer.as_ref())),
    )
        .into_response()
}
