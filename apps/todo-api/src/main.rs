use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use database::mongodb::{client_from_config, spawn_connectivity_probe};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // A .env file is optional
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        url = %config.mongodb.redacted_url(),
        database = config.mongodb.database(),
        "Configuring MongoDB client"
    );

    // The driver connects lazily; the listener starts whether or not MongoDB is up
    let mongo_client = client_from_config(&config.mongodb).await?;
    let probe = spawn_connectivity_probe(
        mongo_client.clone(),
        RetryConfig::new().with_max_retries(5).with_max_delay(10_000),
    );

    let db = mongo_client.database(config.mongodb.database());

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let api_routes = api::routes(&state);

    let root_routes = health_router(state.config.app).merge(api::health::root_router());
    let app = create_router::<openapi::ApiDoc>(api_routes, root_routes)?;

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            probe.abort();
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("ToDo API shutdown complete");
    Ok(())
}
