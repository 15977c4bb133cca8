//! DoodleDream image generation proxy server.

use clap::Parser;
use doodledream_server::{AppState, ServerConfig, router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doodledream_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::parse();
    let addr = config.addr();
    let state = Arc::new(AppState::from_config(config));

    if state.generator.is_none() {
        warn!("OPENAI_API_KEY is not set; generation requests will fail");
    }

    // Forget idle clients once per window.
    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        loop {
            interval.tick().await;
            let removed = limiter.prune();
            if removed > 0 {
                debug!(removed, "pruned idle rate limit entries");
            }
        }
    });

    let app = router(state);

    info!("DoodleDream server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
