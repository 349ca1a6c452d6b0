mod routes;
mod singleton;
mod state;

use anyhow::Result;
use isocal_core::config::{Settings, StorageBackendKind};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();

    tracing::debug!(config = ?settings, "Configuration loaded");

    // Ensure only one instance writes the events file
    let _lock = match settings.storage.backend {
        StorageBackendKind::File => Some(singleton::acquire_lock(&settings.storage.resolved_path())?),
        StorageBackendKind::Memory => None,
    };

    let state = AppState::new(settings.open_store());
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(settings.server.address()).await?;
    tracing::info!(
        backend = ?settings.storage.backend,
        "isocal-server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
