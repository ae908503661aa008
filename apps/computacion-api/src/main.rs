//! Computación API - product catalog over MongoDB

use axum_helpers::server::{create_production_app, create_router, RouterOptions};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{build_client, connect_from_config_with_retry};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        database = config.mongodb.database(),
        collection = %config.collection,
        "Connecting to MongoDB"
    );

    // Requests report their own connection errors, so an unreachable
    // database at startup is not fatal.
    let mongo_client = match connect_from_config_with_retry(&config.mongodb, None).await {
        Ok(client) => {
            info!(
                "Successfully connected to MongoDB database: {}",
                config.mongodb.database()
            );
            client
        }
        Err(e) => {
            warn!(error = %e, "MongoDB unreachable at startup, continuing with a lazy client");
            build_client(&config.mongodb).await?
        }
    };

    let state = AppState::new(config.clone(), mongo_client);

    if let Err(e) = state.manager.repository().init_indexes().await {
        warn!(error = %e, "Could not create product indexes");
    }

    let router = create_router::<openapi::ApiDoc>(
        api::routes(&state),
        &RouterOptions {
            force_json_content_type: config.force_json_content_type,
        },
    )?;

    info!(
        "Starting {} v{} on port {}",
        config.app.name, config.app.version, config.server.port
    );

    create_production_app(
        router,
        &config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            state.mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Computación API shutdown complete");
    Ok(())
}
