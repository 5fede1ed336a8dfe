//! # Response Formatting

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{EntitySchema, NaturalKey};

/// Body of successful update, delete and registration calls
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful create: the message plus the key under its echoed name
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(flatten)]
    pub key: Map<String, Value>,
}

impl CreatedResponse {
    pub fn new(schema: &EntitySchema, key: &NaturalKey) -> Self {
        let mut fields = Map::new();
        fields.insert(schema.created_key_name().to_string(), key.to_json());
        Self {
            message: format!("{} created successfully", schema.label),
            key: fields,
        }
    }
}

/// Body of `GET /collections`
#[derive(Debug, Clone, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<String>,
}
