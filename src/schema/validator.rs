//! Payload validation against an entity schema
//!
//! Validation semantics:
//! - payload must be a JSON object
//! - create: required fields present, defaults filled for absent fields
//! - update: only present fields validated and forwarded, never defaults
//! - undeclared fields are dropped
//! - nulls only where the field is nullable
//! - float accepts integers, nothing else is coerced across types
//! - binary references are decoded to raw bytes after type checks
//!
//! The output is a storage document with fields in schema order.

use bson::{Bson, Document};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{DefaultRule, EntitySchema, FieldDef, FieldType};
use crate::normalize::{bytes_value, encode_binary_refs, json_to_bson};

/// Validates payloads for one entity kind
pub struct SchemaValidator<'a> {
    schema: &'a EntitySchema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Validates a full record for insert, filling defaults with the current time
    pub fn validate_create(&self, payload: &Value) -> SchemaResult<Document> {
        self.validate_create_at(payload, Utc::now())
    }

    /// Validates a full record for insert with an explicit clock
    pub fn validate_create_at(&self, payload: &Value, now: DateTime<Utc>) -> SchemaResult<Document> {
        let obj = self.as_object(payload)?;
        let mut doc = Document::new();

        for (name, def) in &self.schema.fields {
            // An explicit null on a defaulted field asks for the default.
            let present = obj
                .get(name)
                .filter(|value| !(value.is_null() && def.default.is_some()));

            match present {
                Some(value) => {
                    doc.insert(name.clone(), self.validate_field(name, def, value)?);
                }
                None => match def.default {
                    Some(DefaultRule::Now) => {
                        doc.insert(name.clone(), Bson::DateTime(to_bson_datetime(now)));
                    }
                    None if def.required => {
                        return Err(self.fail(ValidationDetails::missing_field(name.as_str())));
                    }
                    None => {}
                },
            }
        }

        self.encode_refs(&mut doc)?;
        Ok(doc)
    }

    /// Validates a partial record for update
    ///
    /// Fails with `RESTO_EMPTY_UPDATE` when no declared field is present.
    pub fn validate_update(&self, payload: &Value) -> SchemaResult<Document> {
        let obj = self.as_object(payload)?;
        let mut doc = Document::new();

        for (name, def) in &self.schema.fields {
            if let Some(value) = obj.get(name) {
                doc.insert(name.clone(), self.validate_field(name, def, value)?);
            }
        }

        if doc.is_empty() {
            return Err(SchemaError::empty_update(&self.schema.kind));
        }

        self.encode_refs(&mut doc)?;
        Ok(doc)
    }

    fn as_object<'v>(&self, payload: &'v Value) -> SchemaResult<&'v Map<String, Value>> {
        payload.as_object().ok_or_else(|| {
            self.fail(ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(payload),
            ))
        })
    }

    fn validate_field(&self, name: &str, def: &FieldDef, value: &Value) -> SchemaResult<Bson> {
        if value.is_null() {
            if def.nullable {
                return Ok(Bson::Null);
            }
            return Err(self.fail(ValidationDetails::null_value(name)));
        }
        self.validate_value(value, &def.field_type, name)
    }

    fn validate_value(&self, value: &Value, expected: &FieldType, path: &str) -> SchemaResult<Bson> {
        match expected {
            FieldType::String => value
                .as_str()
                .map(|s| Bson::String(s.to_string()))
                .ok_or_else(|| self.type_error(path, expected, value)),
            FieldType::Int => whole_number(value)
                .map(Bson::Int64)
                .ok_or_else(|| self.type_error(path, expected, value)),
            FieldType::Float => value
                .as_f64()
                .map(Bson::Double)
                .ok_or_else(|| self.type_error(path, expected, value)),
            FieldType::Bool => value
                .as_bool()
                .map(Bson::Boolean)
                .ok_or_else(|| self.type_error(path, expected, value)),
            FieldType::Timestamp => parse_timestamp(value)
                .map(|ts| Bson::DateTime(to_bson_datetime(ts)))
                .ok_or_else(|| self.type_error(path, expected, value)),
            FieldType::Object => {
                if value.is_object() {
                    Ok(json_to_bson(value))
                } else {
                    Err(self.type_error(path, expected, value))
                }
            }
            FieldType::Array { element_type } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| self.type_error(path, expected, value))?;

                let mut converted = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    if item.is_null() {
                        return Err(self.fail(ValidationDetails::null_value(item_path)));
                    }
                    converted.push(self.validate_value(item, element_type, &item_path)?);
                }
                Ok(Bson::Array(converted))
            }
            FieldType::BinaryRef => match value {
                // Decoded to bytes by `encode_refs` once the whole payload is typed.
                Value::String(s) => Ok(Bson::String(s.clone())),
                Value::Array(items) => items
                    .iter()
                    .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                    .collect::<Option<Vec<u8>>>()
                    .map(bytes_value)
                    .ok_or_else(|| self.type_error(path, expected, value)),
                _ => Err(self.type_error(path, expected, value)),
            },
        }
    }

    fn encode_refs(&self, doc: &mut Document) -> SchemaResult<()> {
        encode_binary_refs(doc, &self.schema.binary_ref_fields()).map_err(|e| {
            self.fail(ValidationDetails::new(e.field, "base64 string", "invalid base64"))
        })
    }

    fn fail(&self, details: ValidationDetails) -> SchemaError {
        SchemaError::validation_failed(&self.schema.kind, details)
    }

    fn type_error(&self, path: &str, expected: &FieldType, actual: &Value) -> SchemaError {
        self.fail(ValidationDetails::type_mismatch(
            path,
            expected.type_name(),
            json_type_name(actual),
        ))
    }
}

/// Accepts RFC 3339, naive ISO-8601 (taken as UTC) and integer Unix seconds
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn to_bson_datetime(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

/// Integers, and floats with no fractional part that fit in an i64
fn whole_number(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Returns the JSON type name for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
