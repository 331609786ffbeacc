//! LLM Client: the single point of entry for all Gemini API calls in TalentFlow.
//!
//! ARCHITECTURAL RULE: No other module may call the provider directly.
//! Handlers depend on the `ScoringModel` trait; `LlmClient` is the production
//! implementation carried in `AppState`.
//!
//! Model: gemini-2.5-flash (fixed; scores are only comparable on one model)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// The model used for all scoring calls.
pub const MODEL: &str = "gemini-2.5-flash";
const TEMPERATURE: f32 = 0.15;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to provider failed: {0}")]
    Http(reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        provider_status: Option<String>,
        message: String,
    },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no text content")]
    EmptyContent { finish_reason: Option<String> },
}

impl LlmError {
    /// Structured fields surfaced to API callers alongside the message.
    /// Never includes the credential: URLs are stripped from transport errors
    /// and the key travels only in a header.
    pub fn details(&self) -> Option<Value> {
        match self {
            LlmError::Http(e) => {
                let mut details = Map::new();
                details.insert("timeout".into(), json!(e.is_timeout()));
                if let Some(status) = e.status() {
                    details.insert("status".into(), json!(status.as_u16()));
                }
                Some(Value::Object(details))
            }
            LlmError::Api {
                status,
                code,
                provider_status,
                ..
            } => {
                let mut details = Map::new();
                details.insert("status".into(), json!(status));
                if let Some(code) = code {
                    details.insert("code".into(), json!(code));
                }
                if let Some(provider_status) = provider_status {
                    details.insert("providerStatus".into(), json!(provider_status));
                }
                Some(Value::Object(details))
            }
            LlmError::EmptyContent {
                finish_reason: Some(reason),
            } => Some(json!({ "finishReason": reason })),
            LlmError::Decode(_) | LlmError::EmptyContent { .. } => None,
        }
    }
}

/// Seam between HTTP handlers and the model provider.
///
/// Carried in `AppState` as `Arc<dyn ScoringModel>`; tests swap in a stub.
#[async_trait]
pub trait ScoringModel: Send + Sync {
    /// Sends `prompt` with `system` as the system instruction and returns the
    /// model's raw text output.
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn finish_reason(&self) -> Option<String> {
        self.candidates.first().and_then(|c| c.finish_reason.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

/// Builds an `LlmError::Api` from a non-success status and raw body,
/// pulling out the provider's structured fields when the body has them.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<ProviderError>(&body) {
        Ok(ProviderError { error }) => LlmError::Api {
            status,
            code: error.code,
            provider_status: error.status,
            message: error.message.unwrap_or(body),
        },
        Err(_) => LlmError::Api {
            status,
            code: None,
            provider_status: None,
            message: body,
        },
    }
}

/// The single Gemini client used by the scoring endpoint.
/// Wraps `generateContent` with an explicit timeout and retry on transient failures.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_base: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{MODEL}:generateContent",
                api_base.trim_end_matches('/')
            ),
        })
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on transport errors, 429 (rate limit) and 5xx with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: TEMPERATURE,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e.without_url()));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(api_error(status.as_u16(), body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(api_error(status.as_u16(), body));
            }

            let body: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Decode(e.without_url().to_string()))?;

            if let Some(usage) = &body.usage_metadata {
                debug!(
                    "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(body);
        }

        Err(last_error.unwrap_or_else(|| LlmError::Api {
            status: 429,
            code: None,
            provider_status: None,
            message: format!("rate limited after {MAX_RETRIES} attempts"),
        }))
    }
}

#[async_trait]
impl ScoringModel for LlmClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        let finish_reason = response.finish_reason();
        response
            .text()
            .ok_or(LlmError::EmptyContent { finish_reason })
    }
}
