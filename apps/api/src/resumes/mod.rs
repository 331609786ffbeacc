//! Resume upload → plain text, for feeding the CRS Tool and candidate records.
//!
//! Accepts `.txt` and `.pdf`. PDF extraction is CPU-bound and runs inside
//! `tokio::task::spawn_blocking`.

use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    PlainText,
    Pdf,
}

impl ResumeFormat {
    /// Content type wins; the file extension is the fallback for clients that
    /// send `application/octet-stream`.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        match content_type.map(|c| c.split(';').next().unwrap_or(c).trim()) {
            Some("text/plain") => return Some(ResumeFormat::PlainText),
            Some("application/pdf") => return Some(ResumeFormat::Pdf),
            _ => {}
        }

        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "txt" => Some(ResumeFormat::PlainText),
            "pdf" => Some(ResumeFormat::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Text file is not valid UTF-8")]
    NotUtf8,
    #[error("Could not read PDF: {0}")]
    Pdf(String),
    #[error("No text could be extracted from the file")]
    Empty,
}

/// Extracts trimmed text from an uploaded resume.
pub fn extract_text(format: ResumeFormat, data: &[u8]) -> Result<String, ExtractError> {
    let text = match format {
        ResumeFormat::PlainText => std::str::from_utf8(data)
            .map_err(|_| ExtractError::NotUtf8)?
            .trim_start_matches('\u{feff}')
            .to_string(),
        ResumeFormat::Pdf => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))?
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub text: String,
    pub characters: usize,
}

/// POST /api/v1/resumes/extract
///
/// Multipart upload with a `file` field. Returns the extracted text.
pub async fn handle_extract(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let format = ResumeFormat::detect(file_name.as_deref(), content_type.as_deref())
            .ok_or_else(|| {
                AppError::Validation(
                    "Invalid file type. Please upload a .txt or .pdf file.".to_string(),
                )
            })?;

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "File exceeds the {} MB upload limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let bytes = data.len();
        let text = tokio::task::spawn_blocking(move || extract_text(format, &data))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    AppError::Validation("Could not read PDF: malformed document".to_string())
                } else {
                    AppError::Internal(e.into())
                }
            })?
            .map_err(|e| AppError::Validation(e.to_string()))?;

        info!(?format, bytes, characters = text.chars().count(), "Resume text extracted");

        return Ok(Json(ExtractResponse {
            file_name,
            characters: text.chars().count(),
            text,
        }));
    }

    Err(AppError::Validation(format!(
        "multipart field `{FILE_FIELD}` is required"
    )))
}
