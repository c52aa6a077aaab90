mod config;
mod errors;
mod fetch;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fetch::HttpPageFetcher;
use crate::llm_client::LlmClient;
use crate::pipeline::runner::{ContentPipeline, PipelineSettings};
use crate::routes::build_router;
use crate::search::SerperClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (missing API keys are fatal)
    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting postgen v{}", env!("CARGO_PKG_VERSION"));

    let search = SerperClient::new(&config.serper_api_key, config.search_result_limit)
        .context("Failed to build search client")?;
    info!("Search client initialized (limit: {})", config.search_result_limit);

    let llm = LlmClient::new(&config.anthropic_api_key).context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", config.llm_model);

    let fetcher =
        HttpPageFetcher::new(config.max_page_chars).context("Failed to build page fetcher")?;

    let pipeline = ContentPipeline::new(
        Arc::new(search),
        Arc::new(llm),
        Arc::new(fetcher),
        PipelineSettings {
            model: config.llm_model.clone(),
            max_page_chars: config.max_page_chars,
        },
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
