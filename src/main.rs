//! shardcache - a sharded in-memory cache server
//!
//! Provides a key-value cache with per-key TTL expiration, probabilistic
//! garbage collection, JSON snapshot persistence, and an HTTP API.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::Cache;
use config::{Config, DEFAULT_CONFIG_FILE};
use tasks::spawn_gc_task;

/// Main entry point for the shardcache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load the server port from the configuration file
/// 3. Create the cache and attempt a best-effort snapshot reload
/// 4. Start the background TTL garbage collector
/// 5. Create the Axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache server");

    let config = Config::load(DEFAULT_CONFIG_FILE);
    info!("Configuration loaded: port={}", config.server_port);

    let cache = Cache::with_defaults();

    // Load any previously persisted data; a missing snapshot at startup is
    // the normal first-run case, not an error.
    match cache.reload().await {
        Ok(()) => info!("Snapshot data loaded"),
        Err(err) => info!("No snapshot data loaded: {}", err),
    }

    let gc_handle = spawn_gc_task(cache.clone());
    info!("Background garbage collector started");

    let app = create_router(AppState::new(cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(gc_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the garbage-collection task and allows
/// graceful shutdown.
async fn shutdown_signal(gc_handle: tokio::task::JoinHandle<()>) {
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    gc_handle.abort();
    warn!("Garbage collection task aborted");
}
