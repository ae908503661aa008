//! MongoDB connector and utilities
//!
//! Client construction from [`MongoConfig`], startup connection with retry
//! and ping-based health probes.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{
    MongoError, build_client, connect_from_config, connect_from_config_with_retry, ping,
};
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
