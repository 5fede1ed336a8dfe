//! # CRUD Handler
//!
//! One handler per entity kind, parameterized by its [`EntitySchema`].
//! Every call is: validate, one store operation (two for delete), normalize.

use std::sync::Arc;

use serde_json::Value;

use crate::normalize::{render_document, render_documents};
use crate::observability::{Event, Logger};
use crate::schema::{EntitySchema, NaturalKey, SchemaError, SchemaResult, SchemaValidator};
use crate::store::{Filter, StoreAdapter, StoreError};

use super::errors::{ApiError, ApiResult};
use super::response::{CreatedResponse, MessageResponse};
use super::status::{Operation, StatusPolicy};

/// Handles the five operations of one entity kind
pub struct CrudHandler {
    schema: Arc<EntitySchema>,
    store: StoreAdapter,
    statuses: Arc<StatusPolicy>,
}

impl CrudHandler {
    pub fn new(schema: EntitySchema, store: StoreAdapter, statuses: Arc<StatusPolicy>) -> Self {
        Self {
            schema: Arc::new(schema),
            store,
            statuses,
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Validate and insert a full record
    ///
    /// Echoes the natural key, or the generated `_id` as `id` for
    /// store-keyed entities.
    pub async fn create(&self, payload: &Value) -> ApiResult<CreatedResponse> {
        let document = self.checked(SchemaValidator::new(&self.schema).validate_create(payload))?;
        let natural = if self.schema.is_store_keyed() {
            None
        } else {
            Some(self.schema.key_of(&document).ok_or_else(|| {
                SchemaError::invalid_schema(
                    &self.schema.kind,
                    format!("validated record has no '{}'", self.schema.key_field),
                )
            })?)
        };

        let id = self.store.insert(&self.schema.collection, document).await?;
        let key = match natural {
            Some(key) => key,
            None => id
                .to_opaque()
                .map(NaturalKey::Stored)
                .map_err(|e| StoreError::Query(e.to_string()))?,
        };
        Logger::emit(
            Event::DocumentCreated,
            &[
                ("_id", &id.to_transport()),
                ("collection", &self.schema.collection),
                ("key", &key.to_string()),
            ],
        );

        Ok(CreatedResponse::new(&self.schema, &key))
    }

    /// Fetch one document by key, normalized for JSON
    pub async fn get(&self, raw_key: &str) -> ApiResult<Value> {
        let filter = self.filter_for(raw_key)?;
        match self.store.find_one(&self.schema.collection, &filter).await? {
            Some(document) => Ok(render_document(&document)),
            None => Err(self.not_found(Operation::Get)),
        }
    }

    /// Apply the fields present in the payload
    pub async fn update(&self, raw_key: &str, payload: &Value) -> ApiResult<MessageResponse> {
        let filter = self.filter_for(raw_key)?;
        let fields = self.checked(SchemaValidator::new(&self.schema).validate_update(payload))?;

        let outcome = self
            .store
            .update_one(&self.schema.collection, &filter, fields)
            .await?;

        if outcome.matched == 0 {
            return Err(self.not_found(Operation::Update));
        }
        if outcome.modified == 0 {
            return Err(self.unchanged("update"));
        }

        Logger::emit(
            Event::DocumentUpdated,
            &[("collection", &self.schema.collection), ("key", raw_key)],
        );
        Ok(MessageResponse::new(format!("{} updated successfully", self.schema.label)))
    }

    /// Delete one document after checking it exists
    pub async fn delete(&self, raw_key: &str) -> ApiResult<MessageResponse> {
        let filter = self.filter_for(raw_key)?;

        if self
            .store
            .find_one(&self.schema.collection, &filter)
            .await?
            .is_none()
        {
            return Err(self.not_found(Operation::Delete));
        }

        // A concurrent delete can win between the check and this call.
        if self.store.delete_one(&self.schema.collection, &filter).await? == 0 {
            return Err(self.unchanged("delete"));
        }

        Logger::emit(
            Event::DocumentDeleted,
            &[("collection", &self.schema.collection), ("key", raw_key)],
        );
        Ok(MessageResponse::new(format!("{} deleted successfully", self.schema.label)))
    }

    /// Up to the list cap of documents, in storage order
    pub async fn list(&self) -> ApiResult<Value> {
        let documents = self.store.find_many(&self.schema.collection).await?;
        Ok(render_documents(&documents))
    }

    fn filter_for(&self, raw_key: &str) -> ApiResult<Filter> {
        let key: NaturalKey = self.checked(self.schema.parse_key(raw_key))?;
        Ok(Filter::eq(self.schema.key_field.as_str(), key.to_bson()))
    }

    fn checked<T>(&self, result: SchemaResult<T>) -> ApiResult<T> {
        result.map_err(|e| {
            Logger::emit(
                Event::ValidationRejected,
                &[
                    ("code", e.code().code()),
                    ("entity", e.entity()),
                    ("message", e.message()),
                ],
            );
            ApiError::Validation(e)
        })
    }

    fn not_found(&self, operation: Operation) -> ApiError {
        ApiError::not_found(
            &self.schema.label,
            self.statuses.not_found(&self.schema.kind, operation),
        )
    }

    fn unchanged(&self, operation: &'static str) -> ApiError {
        ApiError::Unchanged {
            operation,
            label: self.schema.label.clone(),
        }
    }
}
