//! Research brief API handlers
//!
//! POST /ingredient-brief starts (or joins) brief generation and returns
//! the current snapshot; clients poll GET /ingredient-brief/:ingredient
//! until the status turns COMPLETED or FAILED.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, models::BriefSnapshot, AppState};

/// POST /ingredient-brief request
#[derive(Debug, Deserialize)]
pub struct BriefRequest {
    pub ingredient: String,
}

/// POST /ingredient-brief
///
/// Request a research brief. Cached briefs return COMPLETED immediately;
/// otherwise the response is a snapshot of the (possibly just-started)
/// generation job. A blank ingredient yields NOT_STARTED, not an error.
pub async fn request_brief(
    State(state): State<AppState>,
    Json(request): Json<BriefRequest>,
) -> ApiResult<Json<BriefSnapshot>> {
    let snapshot = state.briefs.request_brief(&request.ingredient).await?;
    Ok(Json(snapshot))
}

/// GET /ingredient-brief/:ingredient
///
/// Poll generation progress. Read-only; unknown ingredients report
/// NOT_STARTED.
pub async fn get_brief_progress(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
) -> ApiResult<Json<BriefSnapshot>> {
    let snapshot = state.briefs.get_progress(&ingredient).await?;
    Ok(Json(snapshot))
}

/// Build brief routes
pub fn brief_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredient-brief", post(request_brief))
        .route("/ingredient-brief/:ingredient", get(get_brief_progress))
}
