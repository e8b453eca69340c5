use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seafarer_core::{
    config::config_path, load_config, validate_config, Config, DelugeClient, DownloadClient,
    DownloadClientBackend, Indexer, IndexerBackend, JackettIndexer, QBittorrentClient,
};
use seafarer_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = config_path();
    info!("Loading configuration from {:?}", path);
    let config =
        load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!(
        min_score = config.acquisition.min_score,
        episode_delay_ms = config.acquisition.episode_delay_ms,
        "Configuration loaded successfully"
    );

    let indexer = create_indexer(&config)?;
    let download_client = create_download_client(&config)?;
    info!(
        indexer = indexer.name(),
        download_client = download_client.name(),
        "Collaborators initialized"
    );

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, indexer, download_client));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

fn create_indexer(config: &Config) -> Result<Arc<dyn Indexer>> {
    match config.indexer.backend {
        IndexerBackend::Jackett => {
            let jackett = config
                .indexer
                .jackett
                .clone()
                .context("Jackett backend selected but no [indexer.jackett] section provided")?;
            info!("Initializing Jackett indexer at {}", jackett.url);
            let indexer = JackettIndexer::new(jackett).context("Failed to create Jackett indexer")?;
            Ok(Arc::new(indexer))
        }
    }
}

fn create_download_client(config: &Config) -> Result<Arc<dyn DownloadClient>> {
    match config.download_client.backend {
        DownloadClientBackend::QBittorrent => {
            let qbit = config.download_client.qbittorrent.clone().context(
                "qBittorrent backend selected but no [download_client.qbittorrent] section provided",
            )?;
            info!("Initializing qBittorrent client at {}", qbit.url);
            let client =
                QBittorrentClient::new(qbit).context("Failed to create qBittorrent client")?;
            Ok(Arc::new(client))
        }
        DownloadClientBackend::Deluge => {
            let deluge = config.download_client.deluge.clone().context(
                "Deluge backend selected but no [download_client.deluge] section provided",
            )?;
            info!("Initializing Deluge client at {}", deluge.url);
            let client = DelugeClient::new(deluge).context("Failed to create Deluge client")?;
            Ok(Arc::new(client))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
