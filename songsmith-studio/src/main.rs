//! songsmith-studio - lyrics and music generation service
//!
//! Serves:
//! - `POST /api/generate-lyrics`
//! - `POST /api/generate-music`
//! - `GET /health`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songsmith_common::config::{config_file_path, read_toml_config, RootFolderInitializer};
use songsmith_studio::config::{CliOverrides, StudioConfig, MODULE_NAME};
use songsmith_studio::AppState;

/// Command-line arguments for songsmith-studio
#[derive(Parser, Debug)]
#[command(name = "songsmith-studio")]
#[command(about = "Lyrics and music generation service")]
#[command(version)]
struct Args {
    /// Port to listen on (default 5000)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind (default 0.0.0.0)
    #[arg(short, long)]
    bind: Option<String>,

    /// Root folder for service data (uploads live beneath it)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = config_file_path(MODULE_NAME);
    // Read before the subscriber exists; the outcome is logged below
    let (toml_config, config_source) = read_toml_config(config_path.as_deref());

    // RUST_LOG wins over the TOML level
    let level = toml_config.logging.level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("songsmith_studio={level},songsmith_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting songsmith-studio");
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }
    config_source.log();

    let config = StudioConfig::resolve(
        CliOverrides {
            port: args.port,
            bind: args.bind,
            root_folder: args.root_folder,
        },
        &toml_config,
    );
    config.log_credentials();

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let shutdown = CancellationToken::new();
    let state = AppState::from_config(&config)
        .context("Failed to build provider clients")?
        .with_shutdown(shutdown.clone());
    let assets = state.assets.clone();
    info!("Uploads: {}", assets.dir().display());

    let app = songsmith_studio::build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    if let Err(e) = assets.purge().await {
        error!("Failed to clean up uploads directory: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight generation
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }

    shutdown.cancel();
}
