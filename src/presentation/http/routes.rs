// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{api, crates, keywords, not_found, pages, search};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::{HeaderValue, Method},
    routing::get,
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

fn cors_layer(state: &HttpState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .max_age(Duration::from_secs(3600))
}

pub fn build_router(state: HttpState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/", get(pages::index))
        .route("/search", get(search::search))
        .route("/crates/{crate_id}", get(crates::show))
        .route("/keywords", get(keywords::index))
        .route("/keywords/{keyword_id}", get(keywords::show))
        .route("/me", get(pages::me))
        .route("/health", get(health))
        .route("/api/v1/crates", get(api::list_crates))
        .route("/api/v1/crates/{crate_id}", get(api::get_crate))
        .route("/api/v1/crates/{crate_id}/versions", get(api::crate_versions))
        .route("/api/v1/crates/{crate_id}/downloads", get(api::crate_downloads))
        .route("/api/v1/keywords", get(api::list_keywords))
        .route("/api/v1/keywords/{keyword_id}", get(api::get_keyword))
        .route("/api/v1/me", get(api::me))
        .route("/api/v1/summary", get(api::summary))
        .fallback(not_found::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}
