use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zipcode_lookup::config::TransportKind;
use zipcode_lookup::server::build_app;
use zipcode_lookup::ui::MapSettings;
use zipcode_lookup::{LocationConfig, LookupService, Transport, health};

/// Server configuration
struct ServerConfig {
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,zipcode_lookup=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Read configuration from environment
    let config = ServerConfig::from_env();
    let location =
        LocationConfig::from_env().context("Invalid AWS Location Service configuration")?;

    tracing::info!("AWS Location Service region: {}", location.region);
    match location.transport {
        TransportKind::Rest => tracing::info!("Using API key authentication"),
        TransportKind::Sdk => {
            if let Some(creds) = &location.credentials {
                tracing::info!(
                    "Configuring signed client with access key: {}",
                    creds.masked_access_key()
                );
                if creds.session_token.is_some() {
                    tracing::info!("Using session token for temporary credentials");
                } else {
                    tracing::info!("Using long-term credentials (no session token)");
                }
            }
        }
    }
    if location.map_name.is_none() || location.api_key.is_none() {
        tracing::warn!("AWS_LOCATION_MAP_NAME or AWS_LOCATION_API_KEY not set, map panel disabled");
    }

    let transport = Transport::from_config(&location).context("Failed to build provider client")?;
    let service = Arc::new(LookupService::new(transport));
    let app = build_app(service, MapSettings::from_config(&location));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Single attempt in the background; a failure is logged but doesn't stop the server
    health::spawn_startup_check(&location).context("Failed to build provider client")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
