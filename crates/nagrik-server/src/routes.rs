use crate::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use nagrik_core::catalog::Chapter;
use nagrik_core::schemes::{LanguageOption, SchemesResponse, language_options};
use nagrik_core::simplify::{
    EMPTY_INPUT_MESSAGE, FAILURE_MESSAGE, SimplifyError, SimplifyRequest, SimplifyResponse,
    simplify,
};
use nagrik_render::{LayoutSnapshot, MindMapOptions, MindMapView, SvgRenderOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

/// A `{success: false, message}` body with a status code.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unknown_chapter(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("unknown chapter: {id}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"success": false, "message": self.message})),
        )
            .into_response()
    }
}

pub async fn healthz_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not found")
}

pub async fn schemes_handler(State(state): State<AppState>) -> Json<SchemesResponse> {
    Json(state.schemes.respond().await)
}

/// Same as GET. The body may carry eligibility answers; they are not used for filtering and
/// unreadable bodies are tolerated.
pub async fn schemes_post_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<SchemesResponse> {
    debug!(body_len = body.len(), "ignoring scheme request body");
    Json(state.schemes.respond().await)
}

pub async fn simplify_handler(body: Bytes) -> (StatusCode, Json<SimplifyResponse>) {
    let request = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => SimplifyRequest::from_value(&value),
        Err(err) => {
            error!(error = %err, "unreadable simplify request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SimplifyResponse::failed(FAILURE_MESSAGE)),
            );
        }
    };
    match simplify(request.text()) {
        Ok(result) => (StatusCode::OK, Json(SimplifyResponse::ok(result))),
        Err(SimplifyError::EmptyInput) => (
            StatusCode::BAD_REQUEST,
            Json(SimplifyResponse::failed(EMPTY_INPUT_MESSAGE)),
        ),
    }
}

pub async fn languages_handler() -> Json<Vec<LanguageOption>> {
    Json(language_options())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub display_title: String,
}

impl From<&Chapter> for ChapterSummary {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id.clone(),
            title: chapter.title.clone(),
            subject: chapter.subject.clone(),
            display_title: chapter.display_title(),
        }
    }
}

pub async fn chapters_handler(State(state): State<AppState>) -> Json<Vec<ChapterSummary>> {
    Json(state.catalog.chapters().map(ChapterSummary::from).collect())
}

/// Deep-link state for a rendered mind map: comma-separated ids plus an optional viewport.
#[derive(Debug, Default, Deserialize)]
pub struct MindMapQuery {
    pub expand: Option<String>,
    pub collapse: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

fn id_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn build_view(state: &AppState, id: &str, query: &MindMapQuery) -> Result<MindMapView, ApiError> {
    let chapter = state
        .catalog
        .get(id)
        .ok_or_else(|| ApiError::unknown_chapter(id))?;
    let options = MindMapOptions::default().with_viewport(
        query.width.unwrap_or(state.mindmap.viewport_width),
        query.height.unwrap_or(state.mindmap.viewport_height),
    );
    let mut view = MindMapView::new(chapter.mind_map.clone(), options).map_err(|err| {
        error!(chapter = id, error = %err, "mind map rejected");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "mind map unavailable")
    })?;
    let overrides = id_list(query.expand.as_deref())
        .map(|id| (id, true))
        .chain(id_list(query.collapse.as_deref()).map(|id| (id, false)));
    view.apply(overrides);
    Ok(view)
}

pub async fn mindmap_svg_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MindMapQuery>,
) -> Result<Response, ApiError> {
    let view = build_view(&state, &id, &query)?;
    let title = state.catalog.get(&id).map(Chapter::display_title);
    let svg = nagrik_render::render_mindmap_svg(
        &view,
        &SvgRenderOptions {
            title,
            ..Default::default()
        },
    );
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

pub async fn mindmap_layout_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MindMapQuery>,
) -> Result<Json<LayoutSnapshot>, ApiError> {
    let view = build_view(&state, &id, &query)?;
    Ok(Json(view.snapshot().clone()))
}
