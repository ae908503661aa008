//! API routes module

pub mod health;

use axum::{routing::get, Router};
use domain_products::{handlers, messages, ConnectionManager, ProductService};

use crate::state::AppState;

/// Welcome message
#[utoipa::path(
    get,
    path = "/",
    tag = "Computación",
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    )
)]
pub async fn greeting() -> &'static str {
    messages::GREETING
}

/// Greeting plus the product catalog over any connection manager
pub fn catalog_routes<M: ConnectionManager>(manager: M) -> Router {
    Router::new()
        .route("/", get(greeting))
        .merge(handlers::router(ProductService::new(manager)))
}

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    catalog_routes(state.manager.clone()).merge(health::router(state.clone()))
}
