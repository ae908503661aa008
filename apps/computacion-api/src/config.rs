//! Configuration for the Computación API

use core_config::{app_info, env_flag, env_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::DEFAULT_COLLECTION;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Collection holding the catalog (`MONGODB_COLLECTION`)
    pub collection: String,
    /// Stamp `application/json; charset=utf-8` on every response (`FORCE_JSON_CONTENT_TYPE`)
    pub force_json_content_type: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            collection: env_or_default("MONGODB_COLLECTION", DEFAULT_COLLECTION),
            force_json_content_type: env_flag("FORCE_JSON_CONTENT_TYPE", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET: [(&str, Option<&str>); 9] = [
        ("MONGODB_URL", None),
        ("MONGO_URL", None),
        ("MONGODB_DATABASE", None),
        ("MONGO_DATABASE", None),
        ("MONGODB_COLLECTION", None),
        ("FORCE_JSON_CONTENT_TYPE", None),
        ("PORT", None),
        ("HOST", None),
        ("APP_ENV", None),
    ];

    fn with_env<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = UNSET
            .iter()
            .filter(|(key, _)| !vars.iter().any(|(k, _)| k == key))
            .copied()
            .collect();
        all.extend_from_slice(vars);
        temp_env::with_vars(all, f)
    }

    #[test]
    fn test_defaults() {
        let config = with_env(&[("MONGODB_URL", Some("mongodb://localhost:27017"))], || {
            Config::from_env().unwrap()
        });

        assert_eq!(config.app.name, "computacion_api");
        assert_eq!(config.mongodb.database(), "computacion");
        assert_eq!(config.collection, "computacion");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.force_json_content_type);
    }

    #[test]
    fn test_overrides() {
        let config = with_env(
            &[
                ("MONGO_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("tienda")),
                ("MONGODB_COLLECTION", Some("articulos")),
                ("FORCE_JSON_CONTENT_TYPE", Some("true")),
                ("PORT", Some("8080")),
                ("APP_ENV", Some("production")),
            ],
            || Config::from_env().unwrap(),
        );

        assert_eq!(config.mongodb.url(), "mongodb://db:27017");
        assert_eq!(config.mongodb.database(), "tienda");
        assert_eq!(config.collection, "articulos");
        assert_eq!(config.server.port, 8080);
        assert!(config.environment.is_production());
        assert!(config.force_json_content_type);
    }

    #[test]
    fn test_missing_url_fails() {
        let result = with_env(&[], Config::from_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_flag_fails() {
        let result = with_env(
            &[
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("FORCE_JSON_CONTENT_TYPE", Some("quizas")),
            ],
            Config::from_env,
        );
        assert!(result.is_err());
    }
}
