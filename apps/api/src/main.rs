mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::prompts::PromptTemplates;
use crate::llm_client::{GeminiClient, ResilientGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing GENAI_API_KEY)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("genovance_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Genovance API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let gemini = GeminiClient::new(config.genai_base_url.clone())?;
    let llm = ResilientGenerator::new(
        Arc::new(gemini),
        config.genai_api_key.clone(),
        config.genai_api_key_secondary.clone(),
    );
    info!(
        "LLM client initialized (model: {}, secondary key: {})",
        llm_client::MODEL,
        if llm.has_secondary() { "configured" } else { "absent" }
    );

    // Load prompt templates (built-ins unless PROMPT_TEMPLATES_PATH overrides them)
    let templates = match &config.prompt_templates_path {
        Some(path) => {
            info!("Loading prompt templates from {path}");
            PromptTemplates::from_json_file(path).inspect_err(|e| error!("{e:#}"))?
        }
        None => PromptTemplates::default(),
    };

    let state = AppState {
        llm,
        templates: Arc::new(templates),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
