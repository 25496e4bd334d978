mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod optimizer;
mod render;
mod routes;
mod state;
mod template;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{ChromeRasterizer, PdfExporter};
use crate::llm_client::GeminiClient;
use crate::optimizer::{HttpFetcher, OptimizerService};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GEMINI_API_KEY)
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

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client
    let model = GeminiClient::new(config.gemini.clone())?;
    info!(
        "Gemini client initialized (model: {}, fallback: {})",
        model.model(),
        config.gemini.fallback_model.as_deref().unwrap_or("none")
    );

    // URL downloads share the provider timeout
    let fetcher = HttpFetcher::new(config.gemini.timeout)?;
    let optimizer = OptimizerService::new(Arc::new(model), Arc::new(fetcher));

    // Initialize PDF exporter (headless Chromium rasterizer)
    let rasterizer = ChromeRasterizer::new(
        config.export.chrome_bin.clone(),
        config.export.chrome_no_sandbox,
    );
    let exporter = Arc::new(PdfExporter::new(
        Arc::new(rasterizer),
        config.export.clone(),
    ));
    info!(
        "PDF exporter initialized: {} {:?} {:?}, concurrency {}",
        config.export.chrome_bin,
        config.export.paper,
        config.export.orientation,
        config.export.concurrency
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        optimizer,
        exporter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
