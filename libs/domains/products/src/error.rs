use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use strum::Display;
use thiserror::Error;

/// Fixed response bodies
pub mod messages {
    pub const GREETING: &str = "Bienvenidos a la API de Computación";
    pub const CONNECTION_FAILED: &str = "Error al conectarse a MongoDB";
    pub const DATABASE_FAILURE: &str = "Error al obtener el producto de la base de datos";
    pub const LIST_FAILURE: &str = "Error al obtener los productos de la base de datos";
    pub const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";
    pub const NAME_NOT_FOUND: &str = "Producto no encontrada";
    pub const CATEGORY_NOT_FOUND: &str = "la categoria no existe";
    pub const NOTHING_TO_DELETE: &str = "No se encontró ningun producto con el id seleccionado.";
    pub const INVALID_CODE: &str = "Error en el formato del código de producto.";
    pub const INVALID_CREATE: &str = "Error en el formato de datos a crear.";
    pub const INVALID_MODIFY: &str = "Error en el formato de datos a modificar.";
    pub const INVALID_DELETE: &str = "Error en el formato de datos a eliminar.";
    pub const PRICE_UPDATED: &str = "Precio del Producto Modificado";
}

/// Catalog operation a request maps to, used to pick the bad-input message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Lookup,
    Create,
    Modify,
    Delete,
}

impl Operation {
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::POST => Operation::Create,
            Method::PATCH | Method::PUT => Operation::Modify,
            Method::DELETE => Operation::Delete,
            _ => Operation::Lookup,
        }
    }

    fn invalid_input_message(self) -> &'static str {
        match self {
            Operation::Lookup => messages::INVALID_CODE,
            Operation::Create => messages::INVALID_CREATE,
            Operation::Modify => messages::INVALID_MODIFY,
            Operation::Delete => messages::INVALID_DELETE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Could not acquire a database handle")]
    Connection,

    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("No product name contains '{0}'")]
    NoNameMatch(String),

    #[error("No product category contains '{0}'")]
    NoCategoryMatch(String),

    #[error("No product to delete with codigo {0}")]
    NothingToDelete(i64),

    #[error("Invalid input for {operation}: {reason}")]
    InvalidInput { operation: Operation, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Could not list products: {0}")]
    ListFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn invalid_input(operation: Operation, reason: impl Into<String>) -> Self {
        ProductError::InvalidInput {
            operation,
            reason: reason.into(),
        }
    }

    /// Store faults while listing the whole catalog.
    pub fn into_list_failure(self) -> Self {
        match self {
            ProductError::Database(cause) | ProductError::Internal(cause) => {
                ProductError::ListFailed(cause)
            }
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::NotFound(_)
            | ProductError::NoNameMatch(_)
            | ProductError::NoCategoryMatch(_)
            | ProductError::NothingToDelete(_) => StatusCode::NOT_FOUND,
            ProductError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ProductError::Connection
            | ProductError::Database(_)
            | ProductError::ListFailed(_)
            | ProductError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client. Never carries the underlying cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProductError::Connection => messages::CONNECTION_FAILED,
            ProductError::NotFound(_) => messages::PRODUCT_NOT_FOUND,
            ProductError::NoNameMatch(_) => messages::NAME_NOT_FOUND,
            ProductError::NoCategoryMatch(_) => messages::CATEGORY_NOT_FOUND,
            ProductError::NothingToDelete(_) => messages::NOTHING_TO_DELETE,
            ProductError::InvalidInput { operation, .. } => operation.invalid_input_message(),
            ProductError::Database(_) | ProductError::Internal(_) => messages::DATABASE_FAILURE,
            ProductError::ListFailed(_) => messages::LIST_FAILURE,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
        (status, self.public_message()).into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Internal(err.to_string())
    }
}
