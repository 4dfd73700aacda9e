mod config;
mod dialogue;
mod errors;
mod intake;
mod interview;
mod llm_client;
mod routes;
mod sentiment;
mod state;
mod transcript;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::dialogue::{ControllerSettings, SessionRegistry};
use crate::interview::LlmQuestionGenerator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::sentiment::LexiconSentimentClassifier;
use crate::state::AppState;
use crate::transcript::FileTranscriptSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and the question generator on top of it
    let llm = LlmClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.site_url.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());
    let generator = Arc::new(LlmQuestionGenerator(llm));

    let classifier = Arc::new(LexiconSentimentClassifier);

    let settings = ControllerSettings {
        generation_timeout: config.generation_timeout,
        sentiment_timeout: config.sentiment_timeout,
    };
    let registry = Arc::new(SessionRegistry::new(
        classifier,
        generator,
        settings,
        config.session_idle_timeout,
    ));
    Arc::clone(&registry).spawn_reaper(config.session_reap_interval);
    info!(
        "Session reaper running every {:?} (idle timeout {:?})",
        config.session_reap_interval, config.session_idle_timeout
    );

    let sink = FileTranscriptSink::new(&config.transcript_dir, &config.transcript_filename);
    info!("Transcripts will be appended to {}", sink.path().display());

    // Build app state
    let state = AppState {
        registry,
        sink: Arc::new(sink),
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
