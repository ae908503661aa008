use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProductResult;
use crate::models::{DeletedCount, MatchCount, Product};

/// Repository trait for the product catalog
///
/// Every operation targets the one collection the repository is bound to.
/// Failures surface as `ProductError::Database`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, in store order
    async fn list_all(&self) -> ProductResult<Vec<Product>>;

    /// First product whose `codigo` equals `codigo`
    async fn find_by_code(&self, codigo: i64) -> ProductResult<Option<Product>>;

    /// Products whose `nombre` contains `fragment`, ignoring case
    async fn find_by_name_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>>;

    /// Products whose `categoria` contains `fragment`, ignoring case
    async fn find_by_category_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>>;

    /// Store the document as given. The result carries the assigned `_id`.
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Set `precio` on the first product with `codigo`, whatever its type
    async fn update_price(&self, codigo: i64, precio: Value) -> ProductResult<MatchCount>;

    /// Remove the first product with `codigo`
    async fn delete_by_code(&self, codigo: i64) -> ProductResult<DeletedCount>;
}
