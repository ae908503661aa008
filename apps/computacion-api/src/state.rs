//! Application state management

use domain_products::MongoConnectionManager;
use mongodb::Client;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub manager: MongoConnectionManager,
}

impl AppState {
    pub fn new(config: crate::config::Config, mongo_client: Client) -> Self {
        let manager = MongoConnectionManager::with_collection(
            mongo_client.clone(),
            config.mongodb.database(),
            &config.collection,
        );

        Self {
            config,
            mongo_client,
            manager,
        }
    }
}
