#![forbid(unsafe_code)]

//! HTTP surface: scheme data, plain-language summaries, and chapter mind maps.

mod middleware;
pub mod routes;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use nagrik_core::config::{MindMapConfig, SiteConfig};
use nagrik_core::Catalog;
use nagrik_portal::SchemeService;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] nagrik_core::Error),
    #[error(transparent)]
    Portal(#[from] nagrik_portal::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub schemes: SchemeService,
    pub mindmap: MindMapConfig,
}

impl AppState {
    pub fn new(catalog: Catalog, schemes: SchemeService, mindmap: MindMapConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            schemes,
            mindmap,
        }
    }

    /// Bundled chapters plus an HTTP scheme service built from `config`.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self::new(
            Catalog::builtin()?,
            SchemeService::from_config(config.portal.clone())?,
            config.mindmap.clone(),
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz_handler))
        .route(
            "/api/schemes",
            get(routes::schemes_handler).post(routes::schemes_post_handler),
        )
        .route("/api/simplify-scheme", post(routes::simplify_handler))
        .route("/api/languages", get(routes::languages_handler))
        .route("/api/chapters", get(routes::chapters_handler))
        .route("/api/chapters/{id}/mindmap", get(routes::mindmap_svg_handler))
        .route("/api/chapters/{id}/layout", get(routes::mindmap_layout_handler))
        .fallback(routes::not_found_handler)
        .layer(from_fn(middleware::request_tracing_middleware))
        .with_state(state)
}
