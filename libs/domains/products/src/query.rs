//! Filter and update documents for every catalog lookup.

use mongodb::bson::{self, Bson, Document, doc};
use serde_json::Value;

use crate::models::fields;

/// Matches every document.
pub fn everything() -> Document {
    Document::new()
}

/// Exact match on `codigo`.
pub fn by_code(codigo: i64) -> Document {
    let mut filter = Document::new();
    filter.insert(fields::CODIGO, Bson::Int64(codigo));
    filter
}

/// `field` contains `fragment`, case-insensitive, anywhere in the value.
pub fn containing(field: &str, fragment: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(
        field,
        doc! {
            "$regex": literal_pattern(fragment),
            "$options": "i",
        },
    );
    filter
}

/// Regex source matching `fragment` verbatim.
pub fn literal_pattern(fragment: &str) -> String {
    regex::escape(fragment)
}

/// Replace `precio` and nothing else. The value is stored with whatever type it has.
pub fn set_price(precio: &Value) -> Result<Document, bson::ser::Error> {
    let mut fields = Document::new();
    fields.insert(fields::PRECIO, bson::to_bson(precio)?);
    Ok(doc! { "$set": fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_everything_is_empty_filter() {
        assert!(everything().is_empty());
    }

    #[test]
    fn test_by_code() {
        assert_eq!(by_code(12), doc! { "codigo": 12_i64 });
        assert_eq!(by_code(0), doc! { "codigo": 0_i64 });
    }

    #[test]
    fn test_containing_is_case_insensitive_regex() {
        assert_eq!(
            containing(fields::NOMBRE, "mouse"),
            doc! { "nombre": { "$regex": "mouse", "$options": "i" } }
        );
    }

    #[test]
    fn test_containing_escapes_metacharacters() {
        let filter = containing(fields::CATEGORIA, "a.c(");
        let condition = filter.get_document("categoria").unwrap();
        assert_eq!(condition.get_str("$regex").unwrap(), r"a\.c\(");
    }

    #[test]
    fn test_set_price_touches_only_precio() {
        assert_eq!(
            set_price(&json!(45)).unwrap(),
            doc! { "$set": { "precio": 45_i64 } }
        );
        assert_eq!(
            set_price(&json!(9.99)).unwrap(),
            doc! { "$set": { "precio": 9.99 } }
        );
    }

    #[test]
    fn test_set_price_keeps_non_numeric_values() {
        assert_eq!(
            set_price(&json!("45")).unwrap(),
            doc! { "$set": { "precio": "45" } }
        );
        assert_eq!(
            set_price(&Value::Null).unwrap(),
            doc! { "$set": { "precio": Bson::Null } }
        );
    }
}
