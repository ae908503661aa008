//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::connection::ConnectionManager;
use crate::error::{messages, ProductResult};
use crate::extractors::{CodigoPath, JsonBody};
use crate::models::{PriceUpdate, Product};
use crate::service::ProductService;

/// OpenAPI documentation for the catalog routes
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_price,
        delete_product,
        search_by_name,
        search_by_category,
    ),
    components(schemas(Product, PriceUpdate)),
    tags(
        (name = "Productos", description = "Catálogo de productos de computación")
    )
)]
pub struct ApiDoc;

/// Catalog routes, mounted under `/productos`
pub fn router<M: ConnectionManager>(service: ProductService<M>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/productos", get(list_products).post(create_product))
        .route("/productos/nombre/{nombre}", get(search_by_name))
        .route("/productos/categoria/{categoria}", get(search_by_category))
        .route(
            "/productos/{codigo}",
            get(get_product).patch(update_price).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List every product
#[utoipa::path(
    get,
    path = "/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn list_products<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a product from the request body
#[utoipa::path(
    post,
    path = "/productos",
    tag = "Productos",
    request_body = Product,
    responses(
        (status = 201, description = "Stored document, including its _id", body = Product),
        (status = 400, description = "Body is not a JSON object", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn create_product<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get the first product with a code
#[utoipa::path(
    get,
    path = "/productos/{codigo}",
    tag = "Productos",
    params(
        ("codigo" = i64, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Code is not an integer", body = String, content_type = "text/plain"),
        (status = 404, description = "No product with that code", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn get_product<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    CodigoPath(codigo): CodigoPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(codigo).await?;
    Ok(Json(product))
}

/// Replace the price of the first product with a code
#[utoipa::path(
    patch,
    path = "/productos/{codigo}",
    tag = "Productos",
    params(
        ("codigo" = i64, Path, description = "Product code")
    ),
    request_body = PriceUpdate,
    responses(
        (status = 200, description = "Price set, or no product matched", body = String, content_type = "text/plain"),
        (status = 400, description = "Bad code or body is not JSON", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn update_price<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    CodigoPath(codigo): CodigoPath,
    JsonBody(body): JsonBody<Value>,
) -> ProductResult<impl IntoResponse> {
    let update = PriceUpdate::from_body(body);
    service.update_price(codigo, update.precio).await?;
    Ok(messages::PRICE_UPDATED)
}

/// Delete the first product with a code
#[utoipa::path(
    delete,
    path = "/productos/{codigo}",
    tag = "Productos",
    params(
        ("codigo" = i64, Path, description = "Product code")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Code is not an integer", body = String, content_type = "text/plain"),
        (status = 404, description = "No product with that code", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn delete_product<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    CodigoPath(codigo): CodigoPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(codigo).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products whose name contains a fragment, ignoring case
#[utoipa::path(
    get,
    path = "/productos/nombre/{nombre}",
    tag = "Productos",
    params(
        ("nombre" = String, Path, description = "Name fragment, matched literally")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 404, description = "No name matched", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn search_by_name<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    Path(nombre): Path<String>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.search_by_name(&nombre).await?;
    Ok(Json(products))
}

/// Products whose category contains a fragment, ignoring case
#[utoipa::path(
    get,
    path = "/productos/categoria/{categoria}",
    tag = "Productos",
    params(
        ("categoria" = String, Path, description = "Category fragment, matched literally")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 404, description = "No category matched", body = String, content_type = "text/plain"),
        (status = 500, description = "Store unavailable or failed", body = String, content_type = "text/plain")
    )
)]
async fn search_by_category<M: ConnectionManager>(
    State(service): State<Arc<ProductService<M>>>,
    Path(categoria): Path<String>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.search_by_category(&categoria).await?;
    Ok(Json(products))
}
