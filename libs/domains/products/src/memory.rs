//! In-memory catalog with the same matching rules as the MongoDB store.
//!
//! Used by the handler tests and for running the service without a database.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::connection::ConnectionManager;
use crate::error::{ProductError, ProductResult};
use crate::models::{fields, number_equals_code, DeletedCount, MatchCount, Product};
use crate::query::literal_pattern;
use crate::repository::ProductRepository;

/// Insertion-ordered product list behind an async lock
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    fn check(&self) -> ProductResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProductError::Database("simulated store failure".to_string()));
        }
        Ok(())
    }

    async fn matching(&self, field: &str, fragment: &str) -> ProductResult<Vec<Product>> {
        self.check()?;
        let pattern = fragment_regex(fragment)?;
        let products = self.products.read().await;

        Ok(products
            .iter()
            .filter(|p| {
                p.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| pattern.is_match(value))
            })
            .cloned()
            .collect())
    }
}

fn fragment_regex(fragment: &str) -> ProductResult<Regex> {
    RegexBuilder::new(&literal_pattern(fragment))
        .case_insensitive(true)
        .build()
        .map_err(|e| ProductError::Internal(e.to_string()))
}

fn has_code(product: &Product, codigo: i64) -> bool {
    product
        .get(fields::CODIGO)
        .is_some_and(|value| number_equals_code(value, codigo))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        self.check()?;
        Ok(self.products.read().await.clone())
    }

    async fn find_by_code(&self, codigo: i64) -> ProductResult<Option<Product>> {
        self.check()?;
        let products = self.products.read().await;
        Ok(products.iter().find(|p| has_code(p, codigo)).cloned())
    }

    async fn find_by_name_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        self.matching(fields::NOMBRE, fragment).await
    }

    async fn find_by_category_fragment(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        self.matching(fields::CATEGORIA, fragment).await
    }

    async fn insert(&self, mut product: Product) -> ProductResult<Product> {
        self.check()?;
        if product.id().is_none() {
            product.insert(fields::ID, Value::String(ObjectId::new().to_hex()));
        }

        self.products.write().await.push(product.clone());
        tracing::info!(codigo = ?product.codigo(), "Nuevo producto creado");
        Ok(product)
    }

    async fn update_price(&self, codigo: i64, precio: Value) -> ProductResult<MatchCount> {
        self.check()?;
        let mut products = self.products.write().await;

        match products.iter_mut().find(|p| has_code(p, codigo)) {
            Some(product) => {
                product.insert(fields::PRECIO, precio);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_code(&self, codigo: i64) -> ProductResult<DeletedCount> {
        self.check()?;
        let mut products = self.products.write().await;

        match products.iter().position(|p| has_code(p, codigo)) {
            Some(index) => {
                products.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Connection manager over an [`InMemoryProductRepository`].
///
/// Counts handles in and out so tests can check that every acquire is
/// paired with a release, and can simulate an unreachable store.
#[derive(Clone)]
pub struct InMemoryConnectionManager {
    repository: InMemoryProductRepository,
    available: Arc<AtomicBool>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl InMemoryConnectionManager {
    pub fn new(repository: InMemoryProductRepository) -> Self {
        Self {
            repository,
            available: Arc::new(AtomicBool::new(true)),
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn repository(&self) -> &InMemoryProductRepository {
        &self.repository
    }

    /// When false, `acquire` returns `None`
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new(InMemoryProductRepository::new())
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    type Handle = InMemoryProductRepository;

    async fn acquire(&self) -> Option<InMemoryProductRepository> {
        if !self.available.load(Ordering::SeqCst) {
            tracing::warn!("Error al conectarse a MongoDB");
            return None;
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Some(self.repository.clone())
    }

    async fn release(&self, handle: InMemoryProductRepository) {
        drop(handle);
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
