//! Axum route handlers for the post pipeline.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::post::PipelineRun;
use crate::models::topic::Topic;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub topic: String,
}

/// POST /api/v1/posts
///
/// Runs the full pipeline for one topic. Returns the post together with the
/// intermediate search results, chosen URL and summaries.
pub async fn handle_create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<PipelineRun>, AppError> {
    let Json(request) = payload?;
    let topic = Topic::new(&request.topic).map_err(|e| AppError::Validation(e.to_string()))?;

    let run = state.pipeline.run_detailed(&topic).await?;

    Ok(Json(run))
}
