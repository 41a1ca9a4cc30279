//! Serve command - run the Sonda server
//!
//! Opens the record store, wires the live hub into the API router, and
//! serves until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use sonda_api::{AppState, build_router};
use sonda_config::Config;
use sonda_live::LiveHub;
use sonda_store::ReadingStore;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to configs/config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config_path = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        config = %config_path,
        "Sonda starting"
    );

    let config = load_config(args.config)?;

    if let Err(e) = run_server(config).await {
        error!(error = %e, "server error");
        return Err(e);
    }

    info!("Sonda shutdown complete");
    Ok(())
}

/// Load configuration with the standard fallback chain
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            // User explicitly provided config path - must exist
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "config file not found: {}",
                    path.display()
                ));
            }
            Config::from_file(&path).context("failed to load configuration")
        }
        None => {
            // No config provided - try default paths, fall back to defaults
            let default_paths = [
                PathBuf::from("configs/config.toml"),
                PathBuf::from("config.toml"),
            ];

            for path in &default_paths {
                if path.exists() {
                    info!(config = %path.display(), "using config file");
                    return Config::from_file(path).context("failed to load configuration");
                }
            }

            info!("no config file found, using defaults (port 3000, ~/.sonda/readings.db)");
            Ok(Config::default())
        }
    }
}

/// Main server run loop
async fn run_server(config: Config) -> Result<()> {
    // Create cancellation token for coordinated shutdown
    let cancel = CancellationToken::new();

    // Open the store once at startup. An unreachable database is not fatal:
    // the process keeps serving and store-backed requests fail until a
    // restart with a reachable database.
    let db_path = config.store.db_path();
    let store = match ReadingStore::open(&db_path.display().to_string()).await {
        Ok(store) => store,
        Err(e) => {
            error!(
                error = %e,
                path = %db_path.display(),
                "store unavailable, requests will fail until restart"
            );
            ReadingStore::unavailable()
        }
    };
    let store = Arc::new(store);

    // Live hub + periodic sweep of disconnected subscribers
    let live = Arc::new(LiveHub::new());
    let maintenance = live.spawn_maintenance();

    // Build router
    let state = AppState::new(Arc::clone(&store), Arc::clone(&live));
    let app = build_router(state).layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // Bind
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .context("failed to bind server")?;

    info!(
        addr = %addr,
        store_available = store.is_available(),
        "server listening"
    );

    // Spawn server task
    let serve_cancel = cancel.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                serve_cancel.cancelled().await;
            })
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "server error");
            });
    });

    // Wait for shutdown signal
    wait_for_shutdown().await;

    info!("shutdown signal received, stopping server...");

    cancel.cancel();
    maintenance.abort();
    let _ = server.await;

    Ok(())
}

/// Block until Ctrl+C or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
