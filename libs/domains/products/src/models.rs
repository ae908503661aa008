use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

/// Number of documents matched by an update
pub type MatchCount = u64;

/// Number of documents removed by a delete
pub type DeletedCount = u64;

/// Well-known product fields
pub mod fields {
    pub const ID: &str = "_id";
    pub const CODIGO: &str = "codigo";
    pub const NOMBRE: &str = "nombre";
    pub const CATEGORIA: &str = "categoria";
    pub const PRECIO: &str = "precio";
}

/// Product document.
///
/// Stored and returned as an open JSON object: `codigo`, `nombre`,
/// `categoria` and `precio` are the fields the catalog queries by, but none of
/// them is required and every other field is kept as sent. The store-assigned
/// `_id` is rendered as a hex string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Product(Map<String, Value>);

impl Product {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get(fields::ID)
    }

    /// `codigo` as an integer, accepting integral floats the way the store
    /// compares numbers.
    pub fn codigo(&self) -> Option<i64> {
        self.get(fields::CODIGO).and_then(integral)
    }

    pub fn nombre(&self) -> Option<&str> {
        self.get(fields::NOMBRE).and_then(Value::as_str)
    }

    pub fn categoria(&self) -> Option<&str> {
        self.get(fields::CATEGORIA).and_then(Value::as_str)
    }

    pub fn precio(&self) -> Option<&Number> {
        match self.get(fields::PRECIO) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Encode for storage.
    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(&self.0)
    }

    /// Decode a stored document into its JSON shape.
    pub fn from_document(document: Document) -> Self {
        let fields = document
            .into_iter()
            .map(|(key, value)| {
                let json = if key == fields::ID {
                    id_to_json(value)
                } else {
                    value.into_relaxed_extjson()
                };
                (key, json)
            })
            .collect();
        Self(fields)
    }
}

/// Store id rendered for clients: object ids as hex, anything else as relaxed extended JSON.
pub fn id_to_json(id: Bson) -> Value {
    match id {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

/// Numeric equality with an integer code, the way the store compares mixed numeric types.
pub fn number_equals_code(value: &Value, codigo: i64) -> bool {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i == codigo,
            None => n.as_f64() == Some(codigo as f64),
        },
        _ => false,
    }
}

fn integral(value: &Value) -> Option<i64> {
    let n = value.as_number()?;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// PATCH body.
///
/// `precio` is taken as sent, of any type. A missing field is `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct PriceUpdate {
    /// New price
    #[serde(default)]
    pub precio: Value,
}

impl PriceUpdate {
    /// Read `precio` from any JSON body. Bodies that are not objects carry no price.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut map) => Self {
                precio: map.remove(fields::PRECIO).unwrap_or(Value::Null),
            },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    fn teclado() -> Product {
        Product::from_value(json!({
            "codigo": 100,
            "nombre": "Teclado",
            "categoria": "Perifericos",
            "precio": 50,
            "stock": { "deposito": 3 }
        }))
        .unwrap()
    }

    #[test]
    fn test_accessors_read_known_fields() {
        let product = teclado();
        assert_eq!(product.codigo(), Some(100));
        assert_eq!(product.nombre(), Some("Teclado"));
        assert_eq!(product.categoria(), Some("Perifericos"));
        assert_eq!(product.precio().and_then(Number::as_i64), Some(50));
        assert!(product.id().is_none());
    }

    #[test]
    fn test_codigo_accepts_integral_float_only() {
        let product = Product::from_value(json!({ "codigo": 7.0 })).unwrap();
        assert_eq!(product.codigo(), Some(7));

        let product = Product::from_value(json!({ "codigo": 7.5 })).unwrap();
        assert_eq!(product.codigo(), None);

        let product = Product::from_value(json!({ "codigo": "7" })).unwrap();
        assert_eq!(product.codigo(), None);
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(Product::from_value(json!([1, 2])).is_none());
        assert!(Product::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_unknown_fields_survive_storage_encoding() {
        let product = teclado();
        let document = product.to_document().unwrap();
        assert_eq!(document.get_i64("codigo").unwrap(), 100);
        assert!(document.get_document("stock").is_ok());

        let decoded = Product::from_document(document);
        assert_eq!(decoded, product);
    }

    #[test]
    fn test_from_document_renders_object_id_as_hex() {
        let oid = ObjectId::new();
        let product = Product::from_document(doc! {
            "_id": oid,
            "codigo": 1_i32,
            "precio": 45.5,
        });

        assert_eq!(product.id(), Some(&json!(oid.to_hex())));
        assert_eq!(product.codigo(), Some(1));
        assert_eq!(product.get("precio"), Some(&json!(45.5)));
    }

    #[test]
    fn test_number_equals_code_across_representations() {
        assert!(number_equals_code(&json!(12), 12));
        assert!(number_equals_code(&json!(12.0), 12));
        assert!(!number_equals_code(&json!(12.5), 12));
        assert!(!number_equals_code(&json!("12"), 12));
    }

    #[test]
    fn test_price_update_takes_precio_as_sent() {
        let cases = [
            (json!({ "precio": 45 }), json!(45)),
            (json!({ "precio": "45" }), json!("45")),
            (json!({ "precio": null }), Value::Null),
            (json!({ "nombre": "x" }), Value::Null),
            (json!([45]), Value::Null),
        ];
        for (body, expected) in cases {
            assert_eq!(PriceUpdate::from_body(body).precio, expected);
        }

        let update: PriceUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(update.precio, Value::Null);
    }
}
