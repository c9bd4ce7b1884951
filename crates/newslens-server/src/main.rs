//! NewsLens API Server
//!
//! HTTP service for political-bias analysis of news articles. Serves
//! `POST /analyze` (full article analysis), `POST /stories` (fetch and
//! quick-scan headlines), and `GET /health`. The classifier trains or loads
//! from its bundle in the background at startup.

use newslens_core::ServerConfig;
use newslens_server::api::{build_app_state, build_router, spawn_model_training};
use newslens_server::config;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log level applies from the start.
    let config = load_server_config()?;

    let level: tracing::Level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!(
        listen_addr = %config.listen_addr,
        bundle_path = %config.model.bundle_path,
        "Starting NewsLens server"
    );

    let listen_addr = config.listen_addr.clone();

    // Build shared application state and kick off model training.
    let state = build_app_state(config)?;
    spawn_model_training(state.clone());

    // Build the axum router
    let app = build_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load server configuration from a YAML file or fall back to defaults.
///
/// Checks (in order):
/// 1. First CLI argument as config path
/// 2. `NEWSLENS_CONFIG` environment variable
/// 3. Default configuration
fn load_server_config() -> anyhow::Result<ServerConfig> {
    let config_path: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("NEWSLENS_CONFIG").ok())
        .map(PathBuf::from);

    match config_path {
        Some(path) => config::load_config(&path),
        None => Ok(ServerConfig::default()),
    }
}
