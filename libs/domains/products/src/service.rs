//! Product Service - acquire, query, release

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::connection::ConnectionManager;
use crate::error::{ProductError, ProductResult};
use crate::models::{MatchCount, Product};
use crate::repository::ProductRepository;

/// Product service
///
/// Every operation borrows a handle from the connection manager, runs one
/// repository call and hands the handle back before returning, whatever the
/// outcome. Empty lookups become not-found errors here.
pub struct ProductService<M: ConnectionManager> {
    manager: Arc<M>,
}

impl<M: ConnectionManager> Clone for ProductService<M> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<M: ConnectionManager> ProductService<M> {
    pub fn new(manager: M) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    async fn acquire(&self) -> ProductResult<M::Handle> {
        self.manager.acquire().await.ok_or(ProductError::Connection)
    }

    /// All products
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let handle = self.acquire().await?;
        let result = handle.list_all().await;
        self.manager.release(handle).await;
        result.map_err(ProductError::into_list_failure)
    }

    /// Product with the given code
    #[instrument(skip(self))]
    pub async fn get_product(&self, codigo: i64) -> ProductResult<Product> {
        let handle = self.acquire().await?;
        let result = handle.find_by_code(codigo).await;
        self.manager.release(handle).await;
        result?.ok_or(ProductError::NotFound(codigo))
    }

    /// Products whose name contains `fragment`; at least one
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        let handle = self.acquire().await?;
        let result = handle.find_by_name_fragment(fragment).await;
        self.manager.release(handle).await;
        non_empty(result?, || ProductError::NoNameMatch(fragment.to_string()))
    }

    /// Products whose category contains `fragment`; at least one
    #[instrument(skip(self))]
    pub async fn search_by_category(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        let handle = self.acquire().await?;
        let result = handle.find_by_category_fragment(fragment).await;
        self.manager.release(handle).await;
        non_empty(result?, || ProductError::NoCategoryMatch(fragment.to_string()))
    }

    /// Store a new product as sent
    #[instrument(skip(self, product), fields(codigo = ?product.codigo()))]
    pub async fn create_product(&self, product: Product) -> ProductResult<Product> {
        let handle = self.acquire().await?;
        let result = handle.insert(product).await;
        self.manager.release(handle).await;
        result
    }

    /// Replace the price of the first product with `codigo`.
    ///
    /// `precio` is stored as sent. Zero matches is still a success.
    #[instrument(skip(self))]
    pub async fn update_price(&self, codigo: i64, precio: Value) -> ProductResult<MatchCount> {
        let handle = self.acquire().await?;
        let result = handle.update_price(codigo, precio).await;
        self.manager.release(handle).await;

        let matched = result?;
        if matched == 0 {
            tracing::debug!("No product matched the price update");
        }
        Ok(matched)
    }

    /// Remove the first product with `codigo`
    #[instrument(skip(self))]
    pub async fn delete_product(&self, codigo: i64) -> ProductResult<()> {
        let handle = self.acquire().await?;
        let result = handle.delete_by_code(codigo).await;
        self.manager.release(handle).await;

        match result? {
            0 => Err(ProductError::NothingToDelete(codigo)),
            _ => Ok(()),
        }
    }
}

fn non_empty(
    products: Vec<Product>,
    empty: impl FnOnce() -> ProductError,
) -> ProductResult<Vec<Product>> {
    if products.is_empty() {
        Err(empty())
    } else {
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::MockConnectionManager;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use serde_json::json;

    fn product(value: serde_json::Value) -> Product {
        Product::from_value(value).unwrap()
    }

    /// Manager that lends `repo` once and expects it back exactly once
    fn lending(repo: MockProductRepository) -> ProductService<MockConnectionManager> {
        let mut manager = MockConnectionManager::new();
        manager
            .expect_acquire()
            .times(1)
            .return_once(move || Some(repo));
        manager.expect_release().times(1).return_const(());
        ProductService::new(manager)
    }

    fn unavailable() -> ProductService<MockConnectionManager> {
        let mut manager = MockConnectionManager::new();
        manager.expect_acquire().times(1).return_once(|| None);
        manager.expect_release().never();
        ProductService::new(manager)
    }

    #[tokio::test]
    async fn test_list_products() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_all()
            .returning(|| Ok(vec![product(json!({ "codigo": 1 }))]));

        let products = lending(repo).list_products().await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_code()
            .with(eq(12))
            .returning(|_| Ok(None));

        let result = lending(repo).get_product(12).await;
        assert!(matches!(result, Err(ProductError::NotFound(12))));
    }

    #[tokio::test]
    async fn test_get_product_code_zero_is_a_lookup() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_code()
            .with(eq(0))
            .returning(|_| Ok(Some(product(json!({ "codigo": 0 })))));

        let found = lending(repo).get_product(0).await.unwrap();
        assert_eq!(found.codigo(), Some(0));
    }

    #[tokio::test]
    async fn test_search_by_name_empty_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_name_fragment()
            .withf(|fragment| fragment == "zzz")
            .returning(|_| Ok(vec![]));

        let result = lending(repo).search_by_name("zzz").await;
        assert!(matches!(result, Err(ProductError::NoNameMatch(f)) if f == "zzz"));
    }

    #[tokio::test]
    async fn test_search_by_category_empty_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_category_fragment()
            .returning(|_| Ok(vec![]));

        let result = lending(repo).search_by_category("nada").await;
        assert!(matches!(result, Err(ProductError::NoCategoryMatch(_))));
    }

    #[tokio::test]
    async fn test_search_by_category_returns_matches() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_category_fragment()
            .withf(|fragment| fragment == "peri")
            .returning(|_| Ok(vec![product(json!({ "categoria": "Perifericos" }))]));

        let found = lending(repo).search_by_category("peri").await.unwrap();
        assert_eq!(found[0].categoria(), Some("Perifericos"));
    }

    #[tokio::test]
    async fn test_create_product_returns_stored_document() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().returning(|mut p| {
            p.insert("_id", json!("665f1c2b9e1d4a0012345678"));
            Ok(p)
        });

        let stored = lending(repo)
            .create_product(product(json!({ "codigo": 5, "nombre": "Monitor" })))
            .await
            .unwrap();
        assert_eq!(stored.id(), Some(&json!("665f1c2b9e1d4a0012345678")));
        assert_eq!(stored.nombre(), Some("Monitor"));
    }

    #[tokio::test]
    async fn test_update_price_with_no_match_succeeds() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_price()
            .with(eq(77), eq(json!(10)))
            .returning(|_, _| Ok(0));

        let matched = lending(repo)
            .update_price(77, json!(10))
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_update_price_passes_non_numeric_precio_through() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_price()
            .with(eq(4), eq(json!("45")))
            .returning(|_, _| Ok(1));

        assert_eq!(lending(repo).update_price(4, json!("45")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_nothing_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete_by_code().returning(|_| Ok(0));

        let result = lending(repo).delete_product(3).await;
        assert!(matches!(result, Err(ProductError::NothingToDelete(3))));
    }

    #[tokio::test]
    async fn test_delete_removes_one() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete_by_code().with(eq(3)).returning(|_| Ok(1));

        assert!(lending(repo).delete_product(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_repository_failure_still_releases() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_all()
            .returning(|| Err(ProductError::Database("connection reset".into())));

        let result = lending(repo).list_products().await;
        assert!(matches!(result, Err(ProductError::ListFailed(_))));
    }

    #[tokio::test]
    async fn test_unavailable_connection_skips_repository() {
        let service = unavailable();
        let result = service.get_product(1).await;
        assert!(matches!(result, Err(ProductError::Connection)));
    }
}
