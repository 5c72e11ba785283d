//! Main entry point for Prompt Relay

use prompt_relay::{api, config::Settings, logging, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // API keys usually live in a local .env during development
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    logging::init(&settings.logging)?;

    info!("Starting Prompt Relay");
    info!(
        "Loaded configuration: server={}:{}, default_provider={}",
        settings.server.host, settings.server.port, settings.default_provider
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state
    let app_state = Arc::new(AppState::from_settings(settings)?);
    for status in app_state.providers.list() {
        info!(
            provider = %status.name,
            model = %status.model,
            key_env = %status.key_env,
            key = ?status.key,
            "Provider ready"
        );
    }

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
