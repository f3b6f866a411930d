//! Tavola HTTP Server Binary
//!
//! This is the main entry point for the availability engine's REST API
//! server. It loads configuration, initializes the repository, sets up the
//! HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin tavola-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (overrides the config file)
//! - `PORT`: Server port (overrides the config file)
//! - `TAVOLA_CONFIG`: Path to a TOML configuration file
//! - `TAVOLA_REPOSITORY`: Repository backend ("local")
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tavola::db::{EngineConfig, RepositoryFactory};
use tavola::http::{create_router, AppState};
use tavola::scheduler::GeneratorOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Tavola HTTP Server");

    // Load configuration (defaults when no file is configured)
    let config = EngineConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Initialize the repository backend
    let repository = RepositoryFactory::create_from_name(&config.repository.repo_type)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    info!("Repository initialized ({})", config.repository.repo_type);

    // Create application state
    let generator = GeneratorOptions {
        partial_closure_rule: config.engine.partial_closure_rule,
    };
    let state = AppState::with_generator(repository, generator);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address; env vars override the config file
    let host = env::var("HOST").unwrap_or(config.server.host);
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
