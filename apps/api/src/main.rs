mod analysis;
mod config;
mod errors;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::{MockAnalyzer, ThreadRngScores};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::InMemoryResultStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Insight API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the result store (in-memory, process lifetime)
    let store = Arc::new(InMemoryResultStore::new());
    info!("Result store initialized");

    // Initialize the analyzer with the default random score source
    let analyzer = MockAnalyzer::new(Arc::new(ThreadRngScores));
    info!(
        "Analyzer initialized (delay: {}ms)",
        config.analysis_delay.as_millis()
    );

    // Build app state
    let state = AppState {
        store,
        analyzer,
        config: config.clone(),
    };

    // Build router. Any-origin CORS is part of the API contract.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
