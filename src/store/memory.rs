//! In-memory document store
//!
//! Collections are insertion-ordered vectors behind one `RwLock`. The lock is
//! taken and released inside each operation and never held across an await.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::{DocumentStore, UpdateOutcome};
use crate::normalize::DocKey;

/// Process-local document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Vec<Document>>>> {
        self.ensure_open()?;
        self.collections.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Vec<Document>>>> {
        self.ensure_open()?;
        self.collections.write().map_err(|_| StoreError::Poisoned)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocKey> {
        let existing = document
            .get("_id")
            .map(DocKey::from_bson)
            .transpose()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let (key, stored) = match existing {
            Some(key) => (key, document),
            None => {
                let oid = ObjectId::new();
                let mut stored = Document::new();
                stored.insert("_id", oid);
                for (field, value) in document {
                    stored.insert(field, value);
                }
                (DocKey::Opaque(oid), stored)
            }
        };

        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push(stored);
        Ok(key)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        let mut collections = self.write()?;
        let target = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)));

        let Some(doc) = target else {
            return Ok(UpdateOutcome::default());
        };

        let mut changed = false;
        for (field, value) in fields {
            if doc.get(&field) != Some(&value) {
                doc.insert(field, value);
                changed = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let collections = self.read()?;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

impl From<Vec<(&str, Vec<Document>)>> for MemoryStore {
    /// Seed a store with existing collections
    fn from(seed: Vec<(&str, Vec<Document>)>) -> Self {
        let collections = seed
            .into_iter()
            .map(|(name, docs)| (name.to_string(), docs))
            .collect();
        Self {
            collections: RwLock::new(collections),
            closed: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_generates_object_id_first() {
        let store = MemoryStore::new();
        let key = store
            .insert("Branch", doc! { "branch_id": 1_i64, "branch_name": "A" })
            .await
            .unwrap();

        let stored = store
            .find_one("Branch", &Filter::eq("branch_id", 1_i64))
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(key, DocKey::Opaque(_)));
        assert_eq!(stored.keys().next().unwrap(), "_id");
        assert_eq!(stored.get_object_id("_id").unwrap(), key.to_opaque().unwrap());
    }

    #[tokio::test]
    async fn test_insert_echoes_existing_id() {
        let store = MemoryStore::new();
        let key = store
            .insert("menu", doc! { "_id": "fixed", "item_id": "m1" })
            .await
            .unwrap();
        assert_eq!(key, DocKey::Transport("fixed".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_natural_keys_are_both_stored() {
        let store = MemoryStore::new();
        store.insert("menu", doc! { "item_id": "m1" }).await.unwrap();
        store.insert("menu", doc! { "item_id": "m1" }).await.unwrap();

        let docs = store
            .find_many("menu", &Filter::eq("item_id", "m1"), 10)
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_update_counts() {
        let store = MemoryStore::new();
        store.insert("menu", doc! { "item_id": "m1", "price": 2.0 }).await.unwrap();

        let filter = Filter::eq("item_id", "m1");
        let changed = store
            .update_one("menu", &filter, doc! { "price": 3.0 })
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let unchanged = store
            .update_one("menu", &filter, doc! { "price": 3.0 })
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateOutcome { matched: 1, modified: 0 });

        let missing = store
            .update_one("menu", &Filter::eq("item_id", "zz"), doc! { "price": 1.0 })
            .await
            .unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_delete_removes_one() {
        let store = MemoryStore::new();
        store.insert("orders", doc! { "order_id": "o1" }).await.unwrap();
        store.insert("orders", doc! { "order_id": "o1" }).await.unwrap();

        let filter = Filter::eq("order_id", "o1");
        assert_eq!(store.delete_one("orders", &filter).await.unwrap(), 1);
        assert_eq!(store.find_many("orders", &filter, 10).await.unwrap().len(), 1);
        assert_eq!(store.delete_one("orders", &filter).await.unwrap(), 1);
        assert_eq!(store.delete_one("orders", &filter).await.unwrap(), 0);
        assert_eq!(store.delete_one("nowhere", &filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_many_respects_limit_and_order() {
        let store = MemoryStore::new();
        for i in 0..10_i64 {
            store.insert("inventory", doc! { "n": i }).await.unwrap();
        }

        let docs = store.find_many("inventory", &Filter::all(), 3).await.unwrap();
        let ns: Vec<i64> = docs.iter().map(|d| d.get_i64("n").unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_collection_names_sorted() {
        let store = MemoryStore::new();
        store.insert("orders", doc! {}).await.unwrap();
        store.insert("Branch", doc! {}).await.unwrap();
        assert_eq!(store.collection_names().await.unwrap(), vec!["Branch", "orders"]);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_operations() {
        let store = MemoryStore::new();
        store.close().await.unwrap();

        let err = store.insert("menu", doc! {}).await.unwrap_err();
        assert_eq!(err, StoreError::Closed);
        assert_eq!(
            store.find_one("menu", &Filter::all()).await.unwrap_err(),
            StoreError::Closed
        );
    }

    #[tokio::test]
    async fn test_seeded_store() {
        let store = MemoryStore::from(vec![("menu", vec![doc! { "item_id": "m1" }])]);
        assert!(store
            .find_one("menu", &Filter::eq("item_id", "m1"))
            .await
            .unwrap()
            .is_some());
    }
}
