//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are the
//! per-crate error types rendered through `kernel::error::AppError`.

mod app;
mod config;
mod maintenance;

use activation::{ActivationAppState, JsonFileStore, KeyValueStore, MemoryStore};
use comic::{ComicAppState, OpenAiClient};
use config::AppConfig;
use maintenance::Maintenance;
use kernel::clock::SystemClock;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,activation=info,comic=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Activation store: a JSON file survives restarts, memory does not
    let store: Arc<dyn KeyValueStore> = match &config.activation_store_path {
        Some(path) => {
            let store = JsonFileStore::open(path.clone())?;
            tracing::info!(path = %store.path().display(), "Using JSON file activation store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("ACTIVATION_STORE_PATH not set, activations are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!(
        validity_hours = config.activation.validity_window.as_secs() / 3600,
        secure_cookie = config.activation.cookie_secure,
        "Activation configured"
    );

    let clock = Arc::new(SystemClock);
    let activation = ActivationAppState::new(store.clone(), clock.clone(), config.activation.clone());

    // Startup sweep, then periodic flush and sweep in the background
    let maintenance = Maintenance {
        store: store.clone(),
        clock,
        config: Arc::new(config.activation.clone()),
    };
    let purged = maintenance.sweep().await;
    tracing::info!(purged, "Activation startup sweep completed");
    let upkeep = maintenance
        .clone()
        .spawn(config.store_flush_interval, config.sweep_interval);

    if config.comic.script_api_key.is_none() {
        tracing::warn!("SCRIPT_API_KEY not set, upstream requests are sent unauthenticated");
    }
    let client = OpenAiClient::new(&config.comic)?;
    tracing::info!(
        script_api = %config.comic.script_api_url,
        image_api = %config.comic.image_api_url,
        image_model = %config.comic.image_model,
        "Generation upstreams configured"
    );
    let comic = ComicAppState::new(client, config.comic.clone());

    // Build router
    let app = app::build_router(activation, comic).layer(app::cors_layer(&config.frontend_origins));

    // Start server
    let addr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    upkeep.abort();
    maintenance.flush().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
