//! Recruiter feedback on CRS results.
//!
//! Feedback is kept in memory for the life of the process and written to the
//! structured log, which is where it is collected from.

use std::sync::RwLock;

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackRating {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Potential Match")]
    PotentialMatch,
    #[serde(rename = "Not a Fit")]
    NotAFit,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub rating: Option<FeedbackRating>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub requisition_id: Option<String>,
    #[serde(default)]
    pub candidate_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub rating: FeedbackRating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requisition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct FeedbackLog {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl FeedbackLog {
    pub fn record(&self, submission: FeedbackSubmission) -> Result<FeedbackRecord, AppError> {
        let rating = submission
            .rating
            .ok_or_else(|| AppError::Validation("rating is required".to_string()))?;

        if let Some(score) = submission.score.filter(|s| *s > 100) {
            return Err(AppError::Validation(format!(
                "score must be between 0 and 100, got {score}"
            )));
        }

        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            rating,
            reason: submission
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            score: submission.score,
            requisition_id: submission.requisition_id,
            candidate_id: submission.candidate_id,
            received_at: Utc::now(),
        };

        self.records
            .write()
            .map_err(|_| anyhow!("feedback log lock poisoned"))?
            .push(record.clone());

        Ok(record)
    }

    pub fn count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}

/// POST /api/score/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackRecord>), AppError> {
    let Json(submission) = payload?;
    let record = state.feedback.record(submission)?;

    info!(
        feedback_id = %record.id,
        rating = ?record.rating,
        score = ?record.score,
        requisition_id = ?record.requisition_id,
        total = state.feedback.count(),
        "Recruiter feedback received"
    );

    Ok((StatusCode::ACCEPTED, Json(record)))
}
