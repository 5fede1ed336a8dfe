//! Write path: reference fields → raw bytes
//!
//! Unlike the read path this conversion is not document-wide. Only the named
//! reference fields are touched: a base64 string is decoded to raw bytes, a
//! value that is already raw bytes is kept as-is, and any other value is left
//! for the schema to judge.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document};
use serde_json::Value;
use thiserror::Error;

/// Reference field holds a string that is not valid base64
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' is not valid base64: {reason}")]
pub struct EncodeError {
    pub field: String,
    pub reason: String,
}

/// Wraps raw bytes as a generic binary value
pub fn bytes_value(bytes: Vec<u8>) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes,
    })
}

/// Converts free-form JSON (nested records, line items) to storage values
///
/// Integers become int64 when they fit and doubles otherwise; every other
/// JSON type maps onto its obvious BSON counterpart.
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Bson::Int64(i),
            None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, value) in map {
                doc.insert(key.clone(), json_to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}

/// Decodes base64 strings in the named fields to raw bytes, in place
pub fn encode_binary_refs<S: AsRef<str>>(
    doc: &mut Document,
    fields: &[S],
) -> Result<(), EncodeError> {
    for field in fields {
        let field = field.as_ref();
        let decoded = match doc.get(field) {
            Some(Bson::String(text)) => STANDARD.decode(text).map_err(|e| EncodeError {
                field: field.to_string(),
                reason: e.to_string(),
            })?,
            _ => continue,
        };
        doc.insert(field, bytes_value(decoded));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn raw(doc: &Document, field: &str) -> Vec<u8> {
        doc.get_binary_generic(field).unwrap().clone()
    }

    #[test]
    fn test_base64_string_becomes_bytes() {
        let mut doc = doc! { "order_id": "o-1", "restaurants_id": "AQID" };
        encode_binary_refs(&mut doc, &["restaurants_id", "address_id"]).unwrap();
        assert_eq!(raw(&doc, "restaurants_id"), vec![1, 2, 3]);
        assert!(doc.get("address_id").is_none());
    }

    #[test]
    fn test_raw_bytes_are_kept() {
        let mut doc = doc! { "address_id": bytes_value(vec![0xFF, 0xFE]) };
        encode_binary_refs(&mut doc, &["address_id"]).unwrap();
        assert_eq!(raw(&doc, "address_id"), vec![0xFF, 0xFE]);
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut doc = doc! { "order_type": "AQID", "address_id": "AQID" };
        encode_binary_refs(&mut doc, &["address_id"]).unwrap();
        assert_eq!(doc.get_str("order_type").unwrap(), "AQID");
    }

    #[test]
    fn test_json_to_bson_keeps_structure() {
        let value = serde_json::json!({
            "name": "Ana",
            "qty": 3,
            "price": 4.5,
            "tags": ["a", null],
            "big": u64::MAX,
        });
        let converted = json_to_bson(&value);
        let doc = converted.as_document().unwrap();
        assert_eq!(doc.get_i64("qty").unwrap(), 3);
        assert_eq!(doc.get_f64("price").unwrap(), 4.5);
        assert_eq!(doc.get_array("tags").unwrap()[1], Bson::Null);
        assert!(matches!(doc.get("big"), Some(Bson::Double(_))));
    }

    #[test]
    fn test_invalid_base64_names_field() {
        let mut doc = doc! { "address_id": "not base64!" };
        let err = encode_binary_refs(&mut doc, &["address_id"]).unwrap_err();
        assert_eq!(err.field, "address_id");
    }
}
