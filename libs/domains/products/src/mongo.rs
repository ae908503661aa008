//! MongoDB implementation of ProductRepository and ConnectionManager

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};
use serde_json::Value;
use tracing::instrument;

use crate::connection::ConnectionManager;
use crate::error::ProductResult;
use crate::models::{fields, id_to_json, DeletedCount, MatchCount, Product};
use crate::query;
use crate::repository::ProductRepository;

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "computacion";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Document>,
}

impl MongoProductRepository {
    /// Repository over the default collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    /// Repository over a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Document>(collection_name);
        Self { collection }
    }

    /// Index the lookup key. Codes are not unique, so neither is the index.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "codigo": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_codigo".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    async fn find_many(&self, filter: Document) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Product::from_document).collect())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        self.find_many(query::everything()).await
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, codigo: i64) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(query::by_code(codigo)).await?;
        Ok(document.map(Product::from_document))
    }

    #[instrument(skip(self))]
    async fn find_by_name_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        self.find_many(query::containing(fields::NOMBRE, fragment))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_category_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        self.find_many(query::containing(fields::CATEGORIA, fragment))
            .await
    }

    #[instrument(skip(self, product), fields(codigo = ?product.codigo()))]
    async fn insert(&self, mut product: Product) -> ProductResult<Product> {
        let document = product.to_document()?;
        let result = self.collection.insert_one(document).await?;

        product.insert(fields::ID, id_to_json(result.inserted_id));
        tracing::info!("Nuevo producto creado");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn update_price(&self, codigo: i64, precio: Value) -> ProductResult<MatchCount> {
        let result = self
            .collection
            .update_one(query::by_code(codigo), query::set_price(&precio)?)
            .await?;

        tracing::info!(matched = result.matched_count, "Precio del Producto Modificado");
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete_by_code(&self, codigo: i64) -> ProductResult<DeletedCount> {
        let result = self.collection.delete_one(query::by_code(codigo)).await?;

        if result.deleted_count > 0 {
            tracing::info!("Producto Eliminado");
        }
        Ok(result.deleted_count)
    }
}

/// Lends repositories backed by one shared, pooled client.
///
/// The client is created once at startup. Handles are cheap collection
/// references; releasing one never closes the client, so requests cannot
/// disconnect each other.
#[derive(Clone)]
pub struct MongoConnectionManager {
    database: Database,
    collection: String,
}

impl MongoConnectionManager {
    pub fn new(client: Client, database: &str) -> Self {
        Self::with_collection(client, database, DEFAULT_COLLECTION)
    }

    pub fn with_collection(client: Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        Self {
            database,
            collection: collection.to_string(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Repository over the managed collection, without checking the connection
    pub fn repository(&self) -> MongoProductRepository {
        MongoProductRepository::with_collection(&self.database, &self.collection)
    }
}

#[async_trait]
impl ConnectionManager for MongoConnectionManager {
    type Handle = MongoProductRepository;

    #[instrument(skip(self), fields(database = %self.database.name()))]
    async fn acquire(&self) -> Option<MongoProductRepository> {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => Some(self.repository()),
            Err(e) => {
                tracing::warn!(error = %e, "Error al conectarse a MongoDB");
                None
            }
        }
    }

    async fn release(&self, handle: MongoProductRepository) {
        drop(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::ClientOptions;
    use std::time::Duration;

    async fn unreachable_client() -> Client {
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:1").await.unwrap();
        options.server_selection_timeout = Some(Duration::from_millis(200));
        options.connect_timeout = Some(Duration::from_millis(200));
        Client::with_options(options).unwrap()
    }

    #[tokio::test]
    async fn test_repository_binds_configured_collection() {
        let manager =
            MongoConnectionManager::with_collection(unreachable_client().await, "tienda", "items");

        let repository = manager.repository();
        assert_eq!(repository.collection().name(), "items");
        assert_eq!(repository.collection().namespace().db, "tienda");
    }

    #[tokio::test]
    async fn test_default_collection() {
        let manager = MongoConnectionManager::new(unreachable_client().await, "computacion");
        assert_eq!(manager.repository().collection().name(), DEFAULT_COLLECTION);
    }

    #[tokio::test]
    async fn test_acquire_yields_none_when_unreachable() {
        let manager = MongoConnectionManager::new(unreachable_client().await, "computacion");
        assert!(manager.acquire().await.is_none());
    }
}
