//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for the Computación API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Computación API",
        version = "0.1.0",
        description = "Catálogo de productos de computación sobre MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(crate::api::greeting),
    modifiers(&CatalogPaths),
    tags(
        (name = "Computación", description = "Service endpoints")
    )
)]
pub struct ApiDoc;

/// Adds the catalog routes, which are mounted at the root
struct CatalogPaths;

impl Modify for CatalogPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_products::ApiDoc::openapi());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_greeting_and_catalog() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/"));
        assert!(paths.contains_key("/productos"));
        assert!(paths.contains_key("/productos/{codigo}"));
        assert!(paths.contains_key("/productos/nombre/{nombre}"));
        assert!(paths.contains_key("/productos/categoria/{categoria}"));
    }
}
