//! Axum route handlers for the CRS scoring proxy.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use crate::crs::models::{ScoreRequest, ScoreRequestBody};
use crate::crs::prompts::{build_score_prompt, SCORING_SYSTEM};
use crate::crs::validator::validate_score_response;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/score
///
/// Configuration check → input validation → prompt → upstream → schema check.
/// The validated JSON is relayed exactly as the model produced it.
pub async fn handle_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequestBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let scorer = state
        .scorer
        .as_ref()
        .ok_or_else(|| AppError::Configuration("API key missing.".to_string()))?;

    let Json(body) = payload?;
    let request = ScoreRequest::try_from(body)?;

    let prompt = build_score_prompt(&request);
    debug!(prompt_chars = prompt.len(), "Sending CRS prompt upstream");

    let raw = scorer.generate(&prompt, SCORING_SYSTEM).await?;
    let validated = validate_score_response(&raw)?;

    info!(
        score = validated.report.score,
        strengths = validated.report.strengths.len(),
        weaknesses = validated.report.weaknesses.len(),
        "CRS generated"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        validated.json,
    )
        .into_response())
}

/// OPTIONS /api/score
///
/// Browsers' CORS preflights are answered by the CORS layer; this covers
/// bare OPTIONS requests that carry no preflight headers.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on /api/score.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
