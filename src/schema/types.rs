//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point (integers accepted)
//! - bool: Boolean
//! - timestamp: point in time, stored as a BSON datetime
//! - object: free-form nested record
//! - array: homogeneous sequence with element type
//! - binary_ref: reference stored as raw bytes, sent as base64

use std::fmt;

use bson::oid::ObjectId;
use bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use crate::normalize::DocKey;

/// Field that holds a store-assigned key
pub const STORE_KEY_FIELD: &str = "_id";

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Point in time
    Timestamp,
    /// Free-form nested record
    Object,
    /// Homogeneous array with single element type
    Array {
        #[serde(rename = "element_type")]
        element_type: Box<FieldType>,
    },
    /// Binary reference, base64 on the wire
    BinaryRef,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
            FieldType::Object => "object",
            FieldType::Array { .. } => "array",
            FieldType::BinaryRef => "binary_ref",
        }
    }

    /// Array of free-form records
    pub fn records() -> Self {
        FieldType::Array {
            element_type: Box::new(FieldType::Object),
        }
    }
}

/// Value filled in when a field is absent on create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRule {
    /// Current time
    Now,
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be present on create
    pub required: bool,
    /// Whether an explicit null is accepted
    #[serde(default)]
    pub nullable: bool,
    /// Filled in on create when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultRule>,
}

impl FieldDef {
    /// A required field of the given type
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            nullable: false,
            default: None,
        }
    }

    /// An optional field of the given type
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(field_type)
        }
    }

    pub fn required_string() -> Self {
        Self::required(FieldType::String)
    }

    pub fn required_int() -> Self {
        Self::required(FieldType::Int)
    }

    pub fn required_float() -> Self {
        Self::required(FieldType::Float)
    }

    pub fn required_bool() -> Self {
        Self::required(FieldType::Bool)
    }

    /// Optional timestamp defaulting to the current time
    pub fn created_now() -> Self {
        Self {
            default: Some(DefaultRule::Now),
            ..Self::optional(FieldType::Timestamp)
        }
    }

    /// Accept explicit nulls
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Type of an entity's key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Int,
    Str,
    /// Store-assigned object id, 24 hex digits in URLs
    ObjectId,
}

impl KeyType {
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyType::Int => "int",
            KeyType::Str => "string",
            KeyType::ObjectId => "object_id",
        }
    }
}

/// Who assigns an entity's key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// The client sends it as a declared field
    #[default]
    Natural,
    /// The store generates `_id` on insert
    Store,
}

/// Key value taken from a route or a create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NaturalKey {
    Int(i64),
    Str(String),
    Stored(ObjectId),
}

impl NaturalKey {
    /// Storage form, used in equality filters
    pub fn to_bson(&self) -> Bson {
        match self {
            NaturalKey::Int(i) => Bson::Int64(*i),
            NaturalKey::Str(s) => Bson::String(s.clone()),
            NaturalKey::Stored(oid) => DocKey::Opaque(*oid).into_bson(),
        }
    }

    /// Transport form, echoed in create responses
    pub fn to_json(&self) -> Value {
        match self {
            NaturalKey::Int(i) => Value::from(*i),
            NaturalKey::Str(s) => Value::String(s.clone()),
            NaturalKey::Stored(oid) => Value::String(DocKey::Opaque(*oid).to_transport()),
        }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::Int(i) => write!(f, "{}", i),
            NaturalKey::Str(s) => f.write_str(s),
            NaturalKey::Stored(oid) => write!(f, "{}", oid.to_hex()),
        }
    }
}

/// How an entity's routes are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// `POST /create-e`, `/e/:id`, `GET /es`
    #[default]
    Action,
    /// `POST|GET /e`, `/e/:id`
    Resource,
}

/// Complete definition of one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name, used in config keys ("branch")
    pub kind: String,
    /// Human label used in response messages ("Branch")
    pub label: String,
    /// Collection the documents live in
    pub collection: String,
    /// Route segment for single-document routes
    pub path: String,
    /// Route segment for the list route
    pub list_path: String,
    /// Key field, `_id` for store-assigned keys
    pub key_field: String,
    #[serde(default)]
    pub key_source: KeySource,
    #[serde(default)]
    pub routes: RouteStyle,
    /// Field definitions, in storage order
    pub fields: Vec<(String, FieldDef)>,
}

impl EntitySchema {
    /// Create a schema whose routes and label derive from `kind`
    pub fn new(
        kind: impl Into<String>,
        collection: impl Into<String>,
        key_field: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        Self {
            label: kind.clone(),
            path: kind.clone(),
            list_path: format!("{}s", kind),
            kind,
            collection: collection.into(),
            key_field: key_field.into(),
            key_source: KeySource::Natural,
            routes: RouteStyle::Action,
            fields: Vec::new(),
        }
    }

    /// Create a schema keyed by the store-assigned `_id`, served under
    /// resource-style routes at `path`
    pub fn store_keyed(
        kind: impl Into<String>,
        collection: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            key_source: KeySource::Store,
            routes: RouteStyle::Resource,
            list_path: path.clone(),
            path,
            ..Self::new(kind, collection, STORE_KEY_FIELD)
        }
    }

    pub fn is_store_keyed(&self) -> bool {
        self.key_source == KeySource::Store
    }

    /// Field name the key is echoed under in create responses
    pub fn created_key_name(&self) -> &str {
        match self.key_source {
            KeySource::Natural => &self.key_field,
            KeySource::Store => "id",
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_list_path(mut self, list_path: impl Into<String>) -> Self {
        self.list_path = list_path.into();
        self
    }

    /// Append a field definition
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Looks up a field definition by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, def)| def)
    }

    /// Type of the key
    pub fn key_type(&self) -> SchemaResult<KeyType> {
        if self.is_store_keyed() {
            return Ok(KeyType::ObjectId);
        }
        match self.get(&self.key_field).map(|def| &def.field_type) {
            Some(FieldType::Int) => Ok(KeyType::Int),
            Some(FieldType::String) => Ok(KeyType::Str),
            Some(other) => Err(SchemaError::invalid_schema(
                &self.kind,
                format!("key field '{}' cannot be {}", self.key_field, other.type_name()),
            )),
            None => Err(SchemaError::invalid_schema(
                &self.kind,
                format!("key field '{}' is not declared", self.key_field),
            )),
        }
    }

    /// Fields converted to raw bytes on write
    pub fn binary_ref_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.field_type == FieldType::BinaryRef)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Parses a key taken from a URL path
    pub fn parse_key(&self, raw: &str) -> SchemaResult<NaturalKey> {
        let key_type = self.key_type()?;
        let invalid =
            || SchemaError::invalid_key(&self.kind, &self.key_field, key_type.type_name(), raw);

        match key_type {
            KeyType::Int => raw
                .trim()
                .parse::<i64>()
                .map(NaturalKey::Int)
                .map_err(|_| invalid()),
            KeyType::Str => Ok(NaturalKey::Str(raw.to_string())),
            KeyType::ObjectId => DocKey::Transport(raw.to_string())
                .to_opaque()
                .map(NaturalKey::Stored)
                .map_err(|_| invalid()),
        }
    }

    /// Reads the key out of a validated payload or a stored document
    pub fn key_of(&self, doc: &bson::Document) -> Option<NaturalKey> {
        match doc.get(&self.key_field)? {
            Bson::Int64(i) => Some(NaturalKey::Int(*i)),
            Bson::Int32(i) => Some(NaturalKey::Int(i64::from(*i))),
            Bson::String(s) => Some(NaturalKey::Str(s.clone())),
            Bson::ObjectId(oid) => Some(NaturalKey::Stored(*oid)),
            _ => None,
        }
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.is_store_keyed() {
            if self.key_field != STORE_KEY_FIELD || self.get(STORE_KEY_FIELD).is_some() {
                return Err(SchemaError::invalid_schema(
                    &self.kind,
                    "store-assigned keys live in an undeclared '_id'",
                ));
            }
            return Ok(());
        }

        let key = self
            .get(&self.key_field)
            .ok_or_else(|| {
                SchemaError::invalid_schema(
                    &self.kind,
                    format!("key field '{}' is not declared", self.key_field),
                )
            })?;

        if !key.required || key.nullable {
            return Err(SchemaError::invalid_schema(
                &self.kind,
                format!("key field '{}' must be required and non-null", self.key_field),
            ));
        }

        self.key_type()?;
        Ok(())
    }
}
