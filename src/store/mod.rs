//! # Document store
//!
//! Single-document operations against named collections. Backends implement
//! [`DocumentStore`]; request handlers only ever see a [`StoreAdapter`], which
//! decides how backend faults reach the caller.
//!
//! Backends:
//! - [`MemoryStore`]: insertion-ordered, in process (default)
//! - `MongoStore`: MongoDB, behind the `mongo` feature

mod adapter;
mod config;
mod errors;
mod filter;
mod memory;
#[cfg(feature = "mongo")]
mod mongo;

use async_trait::async_trait;
use bson::Document;

use crate::normalize::DocKey;

pub use adapter::{FaultPolicy, StoreAdapter};
pub use config::{StoreBackend, StoreConfig};
pub use errors::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

/// Maximum number of documents returned by a list query
pub const LIST_CAP: usize = 200;

/// Counts reported by `update_one`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matching the filter (0 or 1)
    pub matched: u64,
    /// Documents whose content changed (0 or 1)
    pub modified: u64,
}

/// Storage backend trait for document collections
///
/// Each call is one atomic single-document operation. Nothing here enforces
/// uniqueness: inserting two documents with the same natural key stores both.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    /// Insert a document, returning its `_id` (generated when absent)
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocKey>;

    /// First document matching the filter
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Set `fields` on the first document matching the filter
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateOutcome>;

    /// Delete the first document matching the filter, returning the count (0 or 1)
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Up to `limit` matching documents, in storage order
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Names of the collections holding documents
    async fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// Release the backend; later calls fail
    async fn close(&self) -> StoreResult<()>;
}
