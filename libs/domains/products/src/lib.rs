//! Products Domain
//!
//! The computación catalog: one MongoDB collection of open product documents
//! looked up by `codigo`, by name fragment or by category fragment.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │     Handlers      │  ← HTTP endpoints, extractors
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │      Service      │  ← acquire / query / release, not-found rules
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ ConnectionManager │  ← lends a repository per request
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │    Repository     │  ← MongoDB or in-memory, filters from `query`
//! └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, mongo::MongoConnectionManager, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let manager = MongoConnectionManager::new(client, "computacion");
//!
//! let service = ProductService::new(manager);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod query;
pub mod repository;
pub mod service;

pub use connection::ConnectionManager;
pub use error::{messages, Operation, ProductError, ProductResult};
pub use extractors::{CodigoPath, JsonBody};
pub use handlers::ApiDoc;
pub use memory::{InMemoryConnectionManager, InMemoryProductRepository};
pub use models::{DeletedCount, MatchCount, PriceUpdate, Product};
pub use mongo::{MongoConnectionManager, MongoProductRepository, DEFAULT_COLLECTION};
pub use repository::ProductRepository;
pub use service::ProductService;
