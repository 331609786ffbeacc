//! Shared fixtures for handler and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, response::Response};
use serde_json::Value;

use crate::llm_client::{LlmError, ScoringModel};
use crate::state::AppState;

enum Reply {
    Text(String),
    ApiError { status: u16, message: String },
}

/// Scripted stand-in for the model provider.
pub struct StubModel {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::with(Reply::Text(text.to_string())))
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self::with(Reply::ApiError {
            status,
            message: message.to_string(),
        }))
    }

    fn with(reply: Reply) -> Self {
        StubModel {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoringModel for StubModel {
    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::ApiError { status, message } => Err(LlmError::Api {
                status: *status,
                code: Some(i64::from(*status)),
                provider_status: Some("RESOURCE_EXHAUSTED".to_string()),
                message: message.clone(),
            }),
        }
    }
}

pub fn state_with(model: Arc<StubModel>) -> AppState {
    let scorer: Arc<dyn ScoringModel> = model;
    AppState::seeded(Some(scorer))
}

pub fn state_without_scorer() -> AppState {
    AppState::seeded(None)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}
