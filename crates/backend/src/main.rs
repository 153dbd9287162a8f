use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use backend::api::AppState;
use backend::shared::artifacts::FsArtifactStore;
use backend::shared::cancel::cancel_pair;
use backend::shared::config;
use backend::shared::data::{db, SqliteDataStore};
use backend::{routes, system};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;
    let settings = config::report_settings(&config)?;

    let db_path = config::get_database_path(&config);
    let connection = db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    tracing::info!(
        "Reports stored in {} and served under {}",
        settings.storage_dir.display(),
        settings.public_prefix
    );

    let (shutdown_handle, shutdown) = cancel_pair();
    let state = AppState::new(
        Arc::new(SqliteDataStore::new(connection)),
        Arc::new(FsArtifactStore::new(
            settings.storage_dir.clone(),
            settings.public_prefix.clone(),
        )),
        settings,
        shutdown.clone(),
    );
    let app = routes::configure_routes(state);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutdown requested");
        shutdown_handle.cancel();
    });

    let mut shutdown = shutdown;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
