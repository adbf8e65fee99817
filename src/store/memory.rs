//! In-memory document store
//!
//! Documents live in a `BTreeMap` keyed by id, so `find` returns matches in
//! ascending id order. Deleting a document drops it entirely; the id can be
//! created again afterwards.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::document::{
    next_revision, Document, FindRequest, FindResponse, IndexAck, IndexOutcome, IndexSpec,
    WriteAck,
};
use super::errors::{StoreError, StoreResult};
use super::DocumentStore;

const NO_INDEX_WARNING: &str =
    "No matching index found, create an index to optimize query time.";

/// Complete store state, used to persist and restore a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub docs: BTreeMap<String, Document>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    /// Replace the whole state with `snapshot`
    pub async fn restore(&self, snapshot: StoreSnapshot) {
        *self.state.write().await = snapshot;
    }

    /// Number of live documents, the sequence counter included
    pub async fn len(&self) -> usize {
        self.state.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Declared indexes, in declaration order
    pub async fn indexes(&self) -> Vec<IndexSpec> {
        self.state.read().await.indexes.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Document> {
        let state = self.state.read().await;
        state
            .docs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn put(&self, mut doc: Document) -> StoreResult<WriteAck> {
        let mut state = self.state.write().await;

        let current = state.docs.get(&doc.id).and_then(|d| d.rev.clone());
        match (&current, &doc.rev) {
            // Fresh create
            (None, None) => {}
            // Update at the latest revision
            (Some(latest), Some(given)) if latest == given => {}
            _ => return Err(StoreError::conflict(&doc.id)),
        }

        let rev = next_revision(current.as_deref());
        doc.rev = Some(rev.clone());
        let id = doc.id.clone();
        state.docs.insert(id.clone(), doc);

        Ok(WriteAck { ok: true, id, rev })
    }

    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck> {
        let mut state = self.state.write().await;

        let latest = match state.docs.get(id) {
            Some(doc) => doc.rev.clone(),
            None => return Err(StoreError::not_found(id)),
        };
        if latest.as_deref() != Some(rev) {
            return Err(StoreError::conflict(id));
        }

        state.docs.remove(id);
        Ok(WriteAck {
            ok: true,
            id: id.to_string(),
            rev: next_revision(Some(rev)),
        })
    }

    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse> {
        let state = self.state.read().await;

        let docs = state
            .docs
            .values()
            .filter(|doc| request.selector.matches(doc))
            .cloned()
            .collect();

        let indexed = state
            .indexes
            .iter()
            .any(|spec| spec.covers(&request.selector));
        let warning = if indexed {
            None
        } else {
            Some(NO_INDEX_WARNING.to_string())
        };

        Ok(FindResponse { docs, warning })
    }

    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck> {
        if spec.fields.is_empty() {
            return Err(StoreError::other("index must name at least one field"));
        }

        let mut state = self.state.write().await;
        let name = spec.name();
        if state.indexes.contains(&spec) {
            return Ok(IndexAck {
                name,
                result: IndexOutcome::Exists,
            });
        }

        state.indexes.push(spec);
        Ok(IndexAck {
            name,
            result: IndexOutcome::Created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Selector;

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let store = MemoryStore::new();
        let ack = store.put(Document::new("a").with_field("n", 1)).await.unwrap();
        assert!(ack.ok);

        let doc = store.get("a").await.unwrap();
        assert_eq!(doc.rev.as_deref(), Some(ack.rev.as_str()));

        let ack2 = store.put(doc.with_field("n", 2)).await.unwrap();
        assert_ne!(ack.rev, ack2.rev);
        assert_eq!(store.get("a").await.unwrap().field("n"), Some(2.into()));
    }

    #[tokio::test]
    async fn test_create_over_existing_conflicts() {
        let store = MemoryStore::new();
        store.put(Document::new("a")).await.unwrap();
        let err = store.put(Document::new("a")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_stale_revision_conflicts() {
        let store = MemoryStore::new();
        let first = store.put(Document::new("a")).await.unwrap();
        store
            .put(Document::new("a").with_rev(first.rev.clone()))
            .await
            .unwrap();

        let err = store
            .put(Document::new("a").with_rev(first.rev))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_remove_requires_latest_revision() {
        let store = MemoryStore::new();
        let ack = store.put(Document::new("a")).await.unwrap();

        assert!(store.remove("a", "1-stale").await.unwrap_err().is_conflict());
        store.remove("a", &ack.rev).await.unwrap();
        assert!(store.get("a").await.unwrap_err().is_not_found());
        assert!(store.remove("a", &ack.rev).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_warns_without_index() {
        let store = MemoryStore::new();
        store
            .put(Document::new("1").with_field("kind", "record"))
            .await
            .unwrap();

        let selector = Selector::new().eq("kind", "record");
        let res = store.find(FindRequest::new(selector.clone())).await.unwrap();
        assert_eq!(res.docs.len(), 1);
        assert!(res.warning.is_some());

        store.create_index(IndexSpec::new(["kind"])).await.unwrap();
        let res = store.find(FindRequest::new(selector)).await.unwrap();
        assert!(res.warning.is_none());
    }

    #[tokio::test]
    async fn test_create_index_idempotent() {
        let store = MemoryStore::new();
        let first = store.create_index(IndexSpec::new(["kind"])).await.unwrap();
        let second = store.create_index(IndexSpec::new(["kind"])).await.unwrap();
        assert_eq!(first.result, IndexOutcome::Created);
        assert_eq!(second.result, IndexOutcome::Exists);
        assert_eq!(store.indexes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_index_rejected() {
        let store = MemoryStore::new();
        let empty: [&str; 0] = [];
        assert!(store.create_index(IndexSpec::new(empty)).await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let store = MemoryStore::new();
        store.put(Document::new("a")).await.unwrap();
        store.create_index(IndexSpec::new(["kind"])).await.unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot().await);
        assert_eq!(restored.snapshot().await, store.snapshot().await);
    }
}
