//! Response validation for CRS model output.
//!
//! The model's text is fence-stripped, parsed, and checked against
//! [`ScoreResponse`] in one declarative step. The accepted JSON is handed
//! back verbatim so nothing the model said is normalized or defaulted.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::crs::models::{json_kind, ScoreResponse};

/// Upper bound on the raw-text excerpt attached to a rejection.
pub const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to parse AI response as JSON: {reason}. Raw response snippet: {snippet}")]
    Malformed { reason: String, snippet: String },

    #[error("AI response has an invalid structure: {reason}. Raw response snippet: {snippet}")]
    InvalidStructure { reason: String, snippet: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Malformed { .. } => "malformed_json",
            ValidationError::InvalidStructure { .. } => "invalid_structure",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ValidationError::Malformed { reason, .. }
            | ValidationError::InvalidStructure { reason, .. } => reason,
        }
    }

    pub fn snippet(&self) -> &str {
        match self {
            ValidationError::Malformed { snippet, .. }
            | ValidationError::InvalidStructure { snippet, .. } => snippet,
        }
    }
}

/// A model response that passed the schema.
#[derive(Debug, Clone)]
pub struct ValidatedScore {
    /// The fence-stripped JSON text exactly as the model produced it.
    pub json: String,
    pub report: ScoreResponse,
}

/// Strips a surrounding ```` ```json ... ``` ```` or ```` ``` ... ``` ```` fence.
/// Text without both an opening and closing fence is returned trimmed.
pub fn strip_json_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Validates raw model output against the CRS schema.
pub fn validate_score_response(raw: &str) -> Result<ValidatedScore, ValidationError> {
    let text = strip_json_fence(raw);

    let value: Value = serde_json::from_str(text).map_err(|e| ValidationError::Malformed {
        reason: e.to_string(),
        snippet: snippet(text),
    })?;

    if !value.is_object() {
        return Err(ValidationError::InvalidStructure {
            reason: format!("expected a JSON object, got {}", json_kind(&value)),
            snippet: snippet(text),
        });
    }

    let report =
        ScoreResponse::deserialize(&value).map_err(|e| ValidationError::InvalidStructure {
            reason: e.to_string(),
            snippet: snippet(text),
        })?;

    Ok(ValidatedScore {
        json: text.to_string(),
        report,
    })
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
