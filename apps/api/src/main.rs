mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod records;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::Database;
use crate::llm_client::GenerationClient;
use crate::models::{CoverLetter, Resume};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let database = match &config.database_url {
        Some(url) => Some(Database::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            None
        }
    };

    // Initialize generation client
    let generator = GenerationClient::gemini(config.gemini_api_key.clone(), config.max_retries)?;
    info!(
        "Generation client initialized (model: {}, max retries: {})",
        llm_client::MODEL,
        config.max_retries
    );

    // Build app state
    let state = match &database {
        Some(db) => {
            let store = Arc::new(db.store());
            AppState {
                generator,
                resumes: store.clone(),
                cover_letters: store,
            }
        }
        None => AppState {
            generator,
            resumes: Arc::new(MemoryStore::<Resume>::new()),
            cover_letters: Arc::new(MemoryStore::<CoverLetter>::new()),
        },
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }
    info!("Shut down cleanly");

    Ok(())
}

/// CORS for the single browser front end, with credentials.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("CORS_ORIGIN '{}' is not a valid origin", config.cors_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
