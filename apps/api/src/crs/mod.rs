// CRS Tool: Contextual Relevance Scoring of a resume against a job description.
// Implements: request validation, prompt building, model output validation, feedback.
// All model calls go through llm_client::ScoringModel; no direct HTTP calls here.

pub mod feedback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod validator;
