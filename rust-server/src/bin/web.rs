//! Shopify Shim Web Server.
//!
//! This binary serves the two verification routes of the embedded app:
//! - `POST /webhooks`: Shopify webhook HMAC check
//! - `GET /api/ping`: session token check
//!
//! Configuration comes from the environment (`SHOPIFY_API_SECRET`,
//! `SHOPIFY_API_KEY`, `PORT`, `ALLOWED_ORIGIN`).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shim::{router, AppState, Config, TrustedOrigin};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        secret_configured = config.api_secret.is_some(),
        api_key_configured = config.api_key.is_some(),
        allowed_origin = %config.allowed_origin,
        "config_loaded"
    );

    if config.api_secret.is_none() {
        error!("SHOPIFY_API_SECRET is not set; /webhooks and /api/ping will answer 500");
    }

    let origin = TrustedOrigin::parse(&config.allowed_origin)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Build the router
    let app = router(AppState::new(config), origin);

    // Bind to address
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
