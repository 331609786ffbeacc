use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::recruiting::dashboard::{summarize, DashboardSummary};
use crate::recruiting::models::{
    Candidate, NewCandidate, NewRequisition, Requisition, RequisitionStatus,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RequisitionQuery {
    pub status: Option<RequisitionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub tag: Option<String>,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let requisitions = state.requisitions.list(None)?;
    let candidates = state.candidates.list(None)?;
    Ok(Json(summarize(&requisitions, &candidates, Utc::now())))
}

/// GET /api/v1/requisitions
pub async fn handle_list_requisitions(
    State(state): State<AppState>,
    query: Result<Query<RequisitionQuery>, QueryRejection>,
) -> Result<Json<Vec<Requisition>>, AppError> {
    let Query(params) = query?;
    Ok(Json(state.requisitions.list(params.status)?))
}

/// GET /api/v1/requisitions/:id
pub async fn handle_get_requisition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Requisition>, AppError> {
    Ok(Json(state.requisitions.get(&id)?))
}

/// POST /api/v1/requisitions
pub async fn handle_create_requisition(
    State(state): State<AppState>,
    payload: Result<Json<NewRequisition>, JsonRejection>,
) -> Result<(StatusCode, Json<Requisition>), AppError> {
    let Json(new) = payload?;
    let requisition = state.requisitions.create(new)?;
    info!(id = %requisition.id, title = %requisition.job_title, "Requisition created");
    Ok((StatusCode::CREATED, Json(requisition)))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    query: Result<Query<CandidateQuery>, QueryRejection>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let Query(params) = query?;
    let tag = params.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    Ok(Json(state.candidates.list(tag)?))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Candidate>, AppError> {
    Ok(Json(state.candidates.get(&id)?))
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    payload: Result<Json<NewCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let Json(new) = payload?;
    let candidate = state.candidates.create(new)?;
    info!(id = %candidate.id, "Candidate created");
    Ok((StatusCode::CREATED, Json(candidate)))
}
