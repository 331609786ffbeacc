mod config;
mod crs;
mod errors;
mod llm_client;
mod recruiting;
mod resumes;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, ScoringModel};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    let scorer = build_scorer(&config)?;
    match &scorer {
        Some(_) => info!(
            "LLM client initialized (model: {}, timeout: {}s)",
            llm_client::MODEL,
            config.upstream_timeout_secs
        ),
        None => warn!("GEMINI_API_KEY is not set; /api/score will answer with a configuration error"),
    }

    let state = AppState::seeded(scorer);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the upstream client when a credential is configured.
fn build_scorer(config: &Config) -> Result<Option<Arc<dyn ScoringModel>>> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        return Ok(None);
    };

    let client = LlmClient::new(
        api_key,
        &config.gemini_api_base,
        Duration::from_secs(config.upstream_timeout_secs),
    )
    .context("failed to build the upstream HTTP client")?;

    Ok(Some(Arc::new(client)))
}
