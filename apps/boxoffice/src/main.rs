//! Box office server.
//!
//! ```bash
//! STORAGE_BACKEND=file DATA_DIR=./data cargo run --bin boxoffice
//! ```

use anyhow::Context;
use boxoffice::config::StorageBackend;
use boxoffice::{AppState, Config, build_router, metrics, seed};
use boxoffice_core::{CollectionStore, InMemoryCollectionStore, JsonFileStore};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("boxoffice=debug,tower_http=debug,{}", config.server.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        addr = %config.server_addr(),
        backend = ?config.storage.backend,
        data_dir = %config.storage.data_dir.display(),
        "Configuration loaded"
    );

    if config.metrics.enabled {
        let addr: SocketAddr = config
            .metrics_addr()
            .parse()
            .with_context(|| format!("invalid metrics address {}", config.metrics_addr()))?;
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        metrics::register_business_metrics();
        tracing::info!(%addr, "Prometheus metrics available at /metrics");
    }

    let store: Arc<dyn CollectionStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(JsonFileStore::new(config.storage.data_dir.clone())),
        StorageBackend::Memory => Arc::new(InMemoryCollectionStore::new()),
    };
    let state = AppState::with_system_clock(store);

    if config.storage.seed_demo_products {
        seed::seed_demo_products(&state.services.products).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.server_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr()))?;
    tracing::info!(addr = %config.server_addr(), "Box office server listening");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined.context("server task panicked")??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    tracing::info!("Shutting down gracefully...");
    let _ = stop_tx.send(());

    match tokio::time::timeout(Duration::from_secs(config.server.shutdown_timeout), server).await {
        Ok(joined) => joined.context("server task panicked")??,
        Err(_) => tracing::warn!(
            timeout_secs = config.server.shutdown_timeout,
            "Open connections did not finish before the shutdown timeout"
        ),
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        }
    }
}
