//! Store adapter
//!
//! Wraps the injected backend and applies the fault policy:
//! - insert faults always surface
//! - with [`FaultPolicy::Surface`] every fault surfaces
//! - with [`FaultPolicy::Swallow`] find/list faults become "absent"/"empty",
//!   delete faults a zero count, and update faults "matched, nothing modified"
//!
//! Every fault is logged either way. No operation is retried.

use std::sync::Arc;

use bson::Document;
use serde::{Deserialize, Serialize};

use super::errors::StoreResult;
use super::filter::Filter;
use super::{DocumentStore, UpdateOutcome, LIST_CAP};
use crate::normalize::DocKey;
use crate::observability::{Event, Logger};

/// What a non-insert store fault turns into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Report faults as internal errors, distinct from not-found
    #[default]
    Surface,
    /// Log faults and report an empty result
    Swallow,
}

impl FaultPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultPolicy::Surface => "surface",
            FaultPolicy::Swallow => "swallow",
        }
    }
}

/// Handle given to request handlers
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn DocumentStore>,
    faults: FaultPolicy,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn DocumentStore>, faults: FaultPolicy) -> Self {
        Self { store, faults }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.faults
    }

    pub async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocKey> {
        self.store
            .insert(collection, document)
            .await
            .inspect_err(|e| log_fault(Event::InsertFailed, collection, e))
    }

    pub async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let result = self.store.find_one(collection, filter).await;
        self.absorb(Event::FindFailed, collection, result, Default::default)
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        let result = self.store.update_one(collection, filter, fields).await;
        // Never reported as zero matched: a swallowed fault is a failed update, not absence.
        self.absorb(Event::UpdateFailed, collection, result, || UpdateOutcome {
            matched: 1,
            modified: 0,
        })
    }

    pub async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self.store.delete_one(collection, filter).await;
        self.absorb(Event::DeleteFailed, collection, result, Default::default)
    }

    /// Every document in the collection, capped at [`LIST_CAP`]
    pub async fn find_many(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let result = self.store.find_many(collection, &Filter::all(), LIST_CAP).await;
        self.absorb(Event::ListFailed, collection, result, Default::default)
    }

    pub async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let result = self.store.collection_names().await;
        self.absorb(Event::ListFailed, "*", result, Default::default)
    }

    pub async fn close(&self) -> StoreResult<()> {
        self.store.close().await?;
        Logger::emit(Event::StoreClosed, &[("backend", self.backend())]);
        Ok(())
    }

    fn absorb<T>(
        &self,
        event: Event,
        collection: &str,
        result: StoreResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> StoreResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                log_fault(event, collection, &e);
                match self.faults {
                    FaultPolicy::Surface => Err(e),
                    FaultPolicy::Swallow => {
                        Logger::emit(
                            Event::ReadFaultSwallowed,
                            &[("collection", collection), ("operation", event.as_str())],
                        );
                        Ok(fallback())
                    }
                }
            }
        }
    }
}

fn log_fault(event: Event, collection: &str, error: &super::StoreError) {
    Logger::emit(event, &[("collection", collection), ("error", &error.to_string())]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use bson::doc;

    async fn closed_adapter(faults: FaultPolicy) -> StoreAdapter {
        let store = Arc::new(MemoryStore::new());
        store.close().await.unwrap();
        StoreAdapter::new(store, faults)
    }

    #[tokio::test]
    async fn test_surface_policy_reports_faults() {
        let adapter = closed_adapter(FaultPolicy::Surface).await;
        let filter = Filter::eq("item_id", "m1");

        assert_eq!(adapter.find_one("menu", &filter).await.unwrap_err(), StoreError::Closed);
        assert_eq!(adapter.find_many("menu").await.unwrap_err(), StoreError::Closed);
        assert_eq!(adapter.delete_one("menu", &filter).await.unwrap_err(), StoreError::Closed);
    }

    #[tokio::test]
    async fn test_swallow_policy_reads_look_empty() {
        let adapter = closed_adapter(FaultPolicy::Swallow).await;
        let filter = Filter::eq("item_id", "m1");

        assert_eq!(adapter.find_one("menu", &filter).await.unwrap(), None);
        assert!(adapter.find_many("menu").await.unwrap().is_empty());
        assert_eq!(
            adapter.update_one("menu", &filter, doc! { "price": 1.0 }).await.unwrap(),
            UpdateOutcome {
                matched: 1,
                modified: 0
            }
        );
        assert_eq!(adapter.delete_one("menu", &filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_faults_always_surface() {
        let adapter = closed_adapter(FaultPolicy::Swallow).await;
        let err = adapter.insert("menu", doc! { "item_id": "m1" }).await.unwrap_err();
        assert_eq!(err, StoreError::Closed);
    }

    #[tokio::test]
    async fn test_list_is_capped() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..250_i64 {
            store.insert("Branch", doc! { "branch_id": i }).await.unwrap();
        }
        let adapter = StoreAdapter::new(store, FaultPolicy::default());
        assert_eq!(adapter.find_many("Branch").await.unwrap().len(), LIST_CAP);
    }
}
