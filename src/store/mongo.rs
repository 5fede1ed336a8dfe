//! MongoDB document store
//!
//! Each trait call maps onto exactly one driver call. The client pool is
//! shared by every request and released by `close`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection, Database};

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::{DocumentStore, UpdateOutcome};
use crate::normalize::DocKey;

/// Document store backed by a MongoDB database
pub struct MongoStore {
    client: Client,
    database: Database,
    closed: AtomicBool,
}

impl MongoStore {
    /// Connect and select `database`
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let database = client.database(database);
        Ok(Self {
            client,
            database,
            closed: AtomicBool::new(false),
        })
    }

    fn collection(&self, name: &str) -> StoreResult<Collection<Document>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(self.database.collection::<Document>(name))
    }
}

fn query_error(e: mongodb::error::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocKey> {
        let result = self
            .collection(collection)?
            .insert_one(document)
            .await
            .map_err(query_error)?;
        DocKey::from_bson(&result.inserted_id).map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.collection(collection)?
            .find_one(filter.to_document())
            .await
            .map_err(query_error)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection(collection)?
            .update_one(filter.to_document(), doc! { "$set": fields })
            .await
            .map_err(query_error)?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self
            .collection(collection)?
            .delete_one(filter.to_document())
            .await
            .map_err(query_error)?;
        Ok(result.deleted_count)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection(collection)?
            .find(filter.to_document())
            .limit(limit)
            .await
            .map_err(query_error)?;
        cursor.try_collect().await.map_err(query_error)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        let mut names = self
            .database
            .list_collection_names()
            .await
            .map_err(query_error)?;
        names.sort();
        Ok(names)
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.client.clone().shutdown().await;
        }
        Ok(())
    }
}
