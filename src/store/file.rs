//! JSON file-backed document store
//!
//! State lives in a [`MemoryStore`]; every successful mutation rewrites the
//! whole snapshot to disk (write to a sibling temp file, then rename).
//! Mutations are serialized so the file always reflects the latest state.
//! A mutation whose write to disk fails is rolled back in memory too.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::document::{
    Document, FindRequest, FindResponse, IndexAck, IndexOutcome, IndexSpec, WriteAck,
};
use super::errors::StoreResult;
use super::memory::{MemoryStore, StoreSnapshot};
use super::DocumentStore;
use crate::observability::{Event, Logger};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let snapshot = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => StoreSnapshot::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreSnapshot::default(),
            Err(e) => return Err(e.into()),
        };

        Logger::event(
            Event::StoreLoaded,
            &[
                ("path", path.display().to_string().as_str()),
                ("documents", snapshot.docs.len().to_string().as_str()),
            ],
        );

        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    /// The in-memory view of the file
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    async fn persist(&self) -> StoreResult<()> {
        let snapshot = self.inner.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;

        Logger::event(
            Event::StorePersisted,
            &[("path", self.path.display().to_string().as_str())],
        );
        Ok(())
    }

    /// Persist after a mutation, restoring `before` if the write fails
    async fn commit<T>(&self, before: StoreSnapshot, value: T) -> StoreResult<T> {
        if let Err(e) = self.persist().await {
            self.inner.restore(before).await;
            Logger::event(
                Event::StoreRolledBack,
                &[
                    ("path", self.path.display().to_string().as_str()),
                    ("error", e.to_string().as_str()),
                ],
            );
            return Err(e);
        }
        Ok(value)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, id: &str) -> StoreResult<Document> {
        self.inner.get(id).await
    }

    async fn put(&self, doc: Document) -> StoreResult<WriteAck> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let ack = self.inner.put(doc).await?;
        self.commit(before, ack).await
    }

    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let ack = self.inner.remove(id, rev).await?;
        self.commit(before, ack).await
    }

    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse> {
        self.inner.find(request).await
    }

    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let ack = self.inner.create_index(spec).await?;
        if ack.result == IndexOutcome::Created {
            return self.commit(before, ack).await;
        }
        Ok(ack)
    }
}
