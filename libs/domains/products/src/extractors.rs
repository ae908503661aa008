//! Request extractors that reject with the catalog's own bad-input messages.

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::{Operation, ProductError};

/// Integer `codigo` path parameter.
///
/// Anything that does not parse as an `i64` is rejected with 400 before a
/// handler runs, so no store handle is ever acquired for it.
///
/// # Example
/// ```ignore
/// async fn get_product(CodigoPath(codigo): CodigoPath) -> String {
///     format!("Producto {}", codigo)
/// }
///
/// let app = Router::new().route("/productos/{codigo}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodigoPath(pub i64);

impl<S> FromRequestParts<S> for CodigoPath
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(&parts.method);

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ProductError::invalid_input(operation, e.body_text()))?;

        raw.parse::<i64>()
            .map(CodigoPath)
            .map_err(|e| ProductError::invalid_input(operation, format!("codigo '{}': {}", raw, e)))
    }
}

/// JSON body whose rejections become `ProductError::InvalidInput`.
///
/// Malformed JSON, a missing content type and a body of the wrong shape all
/// map to the bad-input message of the request's operation.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method());

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ProductError::invalid_input(operation, e.body_text()))?;

        Ok(JsonBody(value))
    }
}
