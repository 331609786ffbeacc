use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Wire shape of `POST /api/score`. Every field is optional here so a missing
/// field is reported by name instead of as a generic body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequestBody {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description_text: Option<String>,
    #[serde(default)]
    pub must_have_keywords: Option<String>,
    #[serde(default)]
    pub nice_to_have_keywords: Option<String>,
}

/// A validated scoring submission. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRequest {
    resume_text: String,
    job_description_text: String,
    must_have_keywords: Option<String>,
    nice_to_have_keywords: Option<String>,
}

impl ScoreRequest {
    /// Rejects blank resume or job description text. Keyword lists are
    /// trimmed and collapse to `None` when empty.
    pub fn new(
        resume_text: Option<String>,
        job_description_text: Option<String>,
        must_have_keywords: Option<String>,
        nice_to_have_keywords: Option<String>,
    ) -> Result<Self, AppError> {
        let resume_text = resume_text.filter(|t| !t.trim().is_empty());
        let job_description_text = job_description_text.filter(|t| !t.trim().is_empty());

        match (resume_text, job_description_text) {
            (Some(resume_text), Some(job_description_text)) => Ok(Self {
                resume_text,
                job_description_text,
                must_have_keywords: trimmed(must_have_keywords),
                nice_to_have_keywords: trimmed(nice_to_have_keywords),
            }),
            (None, None) => Err(AppError::Validation(
                "resumeText and jobDescriptionText are required".to_string(),
            )),
            (None, Some(_)) => Err(AppError::Validation("resumeText is required".to_string())),
            (Some(_), None) => Err(AppError::Validation(
                "jobDescriptionText is required".to_string(),
            )),
        }
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description_text(&self) -> &str {
        &self.job_description_text
    }

    pub fn must_have_keywords(&self) -> Option<&str> {
        self.must_have_keywords.as_deref()
    }

    pub fn nice_to_have_keywords(&self) -> Option<&str> {
        self.nice_to_have_keywords.as_deref()
    }
}

impl TryFrom<ScoreRequestBody> for ScoreRequest {
    type Error = AppError;

    fn try_from(body: ScoreRequestBody) -> Result<Self, Self::Error> {
        ScoreRequest::new(
            body.resume_text,
            body.job_description_text,
            body.must_have_keywords,
            body.nice_to_have_keywords,
        )
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Response schema
// ────────────────────────────────────────────────────────────────────────────

/// The CRS result schema. Deserializing into this type *is* the validation:
/// a document that fails to deserialize is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub explanation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_analysis"
    )]
    pub detailed_analysis: Option<DetailedAnalysis>,
}

/// Optional breakdown. Absent fields are fine; an explicit `null` is a type
/// mismatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub keyword_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub experience_relevance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub skill_adjacency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub potential_alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub quantifiable_achievements: Option<Vec<String>>,
}

/// Only invoked when the key exists, so `null` reaches `T` and is rejected.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Accepts any JSON number with no fractional part in 0..=100, so `80.0`
/// passes and `50.5` does not.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=100.0).contains(f)),
        _ => None,
    };
    score.map(|f| f as u8).ok_or_else(|| {
        D::Error::custom(format!(
            "score must be an integer between 0 and 100, got {value}"
        ))
    })
}

fn deserialize_analysis<'de, D>(deserializer: D) -> Result<Option<DetailedAnalysis>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("detailedAnalysis: {e}"))),
        other => Err(D::Error::custom(format!(
            "detailedAnalysis must be an object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
