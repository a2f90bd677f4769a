//! Entry point for the logbook-server binary.

use std::sync::Arc;

use axum::{ServiceExt, extract::Request};
use logbook_server::{AppState, Collection, build_app, config::ServerConfig};
use logbook_store::{MySqlStore, RecordStore, StoreError};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!("Starting logbook-server");
    tracing::info!(
        "Configuration: port={}, log_level={}, notes={}.{}, system_logs={}.{}",
        config.port,
        config.log_level,
        config.notes_database,
        config.notes_table,
        config.systems_database,
        config.system_logs_table
    );

    // Build stores; connections open on first use
    let notes_store: Arc<dyn RecordStore> = Arc::new(MySqlStore::connect_lazy(
        &config.store_config(&config.notes_database),
    ));
    let systems_store: Arc<dyn RecordStore> = if config.shares_database() {
        notes_store.clone()
    } else {
        Arc::new(MySqlStore::connect_lazy(
            &config.store_config(&config.systems_database),
        ))
    };

    check_store("Notes", notes_store.as_ref(), config.require_store_on_startup).await?;
    if !config.shares_database() {
        check_store("Systems", systems_store.as_ref(), config.require_store_on_startup).await?;
    }

    // Build application state
    let state = AppState::new(
        config.clone(),
        vec![
            Collection::new(config.notes_spec()?, notes_store),
            Collection::new(config.system_logs_spec()?, systems_store),
        ],
    );

    let app = build_app(&state)?;

    // Create listener
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://localhost:{}", config.port);

    // Run server with graceful shutdown
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Startup connectivity check.
///
/// A failure is logged and the server keeps running unless the store is
/// required, in which case startup aborts.
async fn check_store(label: &str, store: &dyn RecordStore, required: bool) -> Result<(), StoreError> {
    match store.ping().await {
        Ok(()) => {
            tracing::info!("Connected to {} Database", label);
            Ok(())
        }
        Err(e) if required => {
            tracing::error!(error = %e, "Error connecting to {} Database", label);
            Err(e)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Error connecting to {} Database; requests will fail until it is reachable",
                label
            );
            Ok(())
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
