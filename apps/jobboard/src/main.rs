mod board;
mod config;
mod errors;
mod forms;
mod models;
mod resume;
mod routes;
mod state;
mod upstream;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::source::HttpListingSource;
use crate::board::Board;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::{UpstreamClient, UpstreamQuery};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobboard v{}", env!("CARGO_PKG_VERSION"));

    let upstream = UpstreamClient::new(config.upstream_url.clone());
    info!("Upstream: {}", upstream.base_url());

    // Unfiltered listings shown at startup and restored whenever filters clear.
    let baseline = match upstream.fetch_listings(&UpstreamQuery::default()).await {
        Ok(listings) => {
            info!("Loaded {} baseline listings", listings.len());
            listings
        }
        Err(e) => {
            error!("Baseline fetch failed, starting with an empty board: {e}");
            Vec::new()
        }
    };

    let source = Arc::new(HttpListingSource(upstream.clone()));
    let board = Board::new(baseline, source, config.search_debounce).await;
    info!("Search debounce: {:?}", config.search_debounce);

    let state = AppState {
        upstream,
        board: Arc::new(board),
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
