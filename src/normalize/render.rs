//! Read path: stored documents → transport JSON
//!
//! Applied recursively: mappings recurse on values, sequences on elements,
//! scalars are classified:
//!
//! | stored value        | rendered as                          |
//! |---------------------|--------------------------------------|
//! | object id           | lowercase hex string                 |
//! | bytes, valid UTF-8  | the decoded text                     |
//! | bytes, not UTF-8    | standard padded base64               |
//! | datetime            | RFC 3339 UTC, millisecond precision  |
//! | int32/int64/double  | JSON number (non-finite → null)      |
//! | anything else       | relaxed extended JSON                |

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bson::{Bson, Document};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

/// Renders a whole document
pub fn render_document(doc: &Document) -> Value {
    let mut out = Map::with_capacity(doc.len());
    for (key, value) in doc {
        out.insert(key.clone(), render_value(value));
    }
    Value::Object(out)
}

/// Renders a list of documents as a JSON array
pub fn render_documents(docs: &[Document]) -> Value {
    Value::Array(docs.iter().map(render_document).collect())
}

/// Renders a single stored value
pub fn render_value(value: &Bson) -> Value {
    match value {
        Bson::Document(doc) => render_document(doc),
        Bson::Array(items) => Value::Array(items.iter().map(render_value).collect()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Binary(binary) => Value::String(render_bytes(&binary.bytes)),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Bson::DateTime(dt) => render_datetime(dt.timestamp_millis()),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Text if the bytes are valid UTF-8, base64 otherwise
pub fn render_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => STANDARD.encode(bytes),
    }
}

fn render_datetime(millis: i64) -> Value {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => Value::from(millis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use bson::spec::BinarySubtype;
    use bson::{doc, Binary};
    use serde_json::json;

    fn bytes(raw: &[u8]) -> Bson {
        Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: raw.to_vec(),
        })
    }

    #[test]
    fn test_object_id_renders_as_hex() {
        let oid = ObjectId::new();
        assert_eq!(render_value(&Bson::ObjectId(oid)), json!(oid.to_hex()));
    }

    #[test]
    fn test_invalid_utf8_renders_as_base64() {
        assert_eq!(render_value(&bytes(&[0xFF, 0xFE])), json!("//4="));
    }

    #[test]
    fn test_base64_fallback_is_deterministic() {
        let payload = bytes(&[0xC3, 0x28, 0xA0, 0xA1, 0x00, 0xFF]);
        let first = render_value(&payload);
        for _ in 0..50 {
            assert_eq!(render_value(&payload), first);
        }
    }

    #[test]
    fn test_valid_utf8_bytes_render_as_text() {
        // Control bytes are valid single-byte UTF-8, so no base64 here.
        assert_eq!(render_value(&bytes(&[1, 2, 3])), json!("\u{1}\u{2}\u{3}"));
        assert_eq!(render_value(&bytes("caf\u{e9}".as_bytes())), json!("caf\u{e9}"));
    }

    #[test]
    fn test_nested_structures_are_walked() {
        let oid = ObjectId::new();
        let stored = doc! {
            "_id": oid,
            "customer": { "name": "Ana", "ref": bytes(&[0xFF]) },
            "items": [ { "sku": "A1", "qty": 2_i64 }, { "owner": oid } ],
            "total_price": 12.5,
        };

        let rendered = render_document(&stored);
        assert_eq!(
            rendered,
            json!({
                "_id": oid.to_hex(),
                "customer": { "name": "Ana", "ref": "/w==" },
                "items": [ { "sku": "A1", "qty": 2 }, { "owner": oid.to_hex() } ],
                "total_price": 12.5,
            })
        );
    }

    #[test]
    fn test_datetime_renders_rfc3339() {
        let dt = bson::DateTime::from_millis(1_700_000_000_123);
        assert_eq!(
            render_value(&Bson::DateTime(dt)),
            json!("2023-11-14T22:13:20.123Z")
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(render_value(&Bson::Int32(4)), json!(4));
        assert_eq!(render_value(&Bson::Boolean(false)), json!(false));
        assert_eq!(render_value(&Bson::Null), Value::Null);
        assert_eq!(render_value(&Bson::Double(f64::NAN)), Value::Null);
    }
}
