//! Store doubles shared by the integration tests
//!
//! - `CountingStore`: counts every primitive call
//! - `FailingStore`: fails chosen primitives with a chosen error
//! - `YieldingStore`: yields to the scheduler before every call, so
//!   concurrent operations interleave at each store access

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docgate::gateway::{MessageLog, RecordGateway};
use docgate::store::{
    Document, DocumentStore, FindRequest, FindResponse, IndexAck, IndexSpec, MemoryStore,
    StoreError, StoreResult, WriteAck,
};
use docgate::GatewayConfig;

// =============================================================================
// Counting
// =============================================================================

#[derive(Debug, Default)]
pub struct CallCounts {
    pub get: AtomicUsize,
    pub put: AtomicUsize,
    pub remove: AtomicUsize,
    pub find: AtomicUsize,
    pub create_index: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.get.load(Ordering::SeqCst)
            + self.put.load(Ordering::SeqCst)
            + self.remove.load(Ordering::SeqCst)
            + self.find.load(Ordering::SeqCst)
            + self.create_index.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub calls: CallCounts,
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn get(&self, id: &str) -> StoreResult<Document> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn put(&self, doc: Document) -> StoreResult<WriteAck> {
        self.calls.put.fetch_add(1, Ordering::SeqCst);
        self.inner.put(doc).await
    }

    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck> {
        self.calls.remove.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(id, rev).await
    }

    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse> {
        self.calls.find.fetch_add(1, Ordering::SeqCst);
        self.inner.find(request).await
    }

    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck> {
        self.calls.create_index.fetch_add(1, Ordering::SeqCst);
        self.inner.create_index(spec).await
    }
}

// =============================================================================
// Failure injection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Put,
    Remove,
    Find,
    CreateIndex,
}

#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    failures: Mutex<Vec<(Op, StoreError)>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` fail with `err` until cleared
    pub fn fail(&self, op: Op, err: StoreError) {
        self.failures.lock().unwrap().push((op, err));
    }

    pub fn clear(&self) {
        self.failures.lock().unwrap().clear();
    }

    fn check(&self, op: Op) -> StoreResult<()> {
        let failures = self.failures.lock().unwrap();
        match failures.iter().find(|(o, _)| *o == op) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, id: &str) -> StoreResult<Document> {
        self.check(Op::Get)?;
        self.inner.get(id).await
    }

    async fn put(&self, doc: Document) -> StoreResult<WriteAck> {
        self.check(Op::Put)?;
        self.inner.put(doc).await
    }

    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck> {
        self.check(Op::Remove)?;
        self.inner.remove(id, rev).await
    }

    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse> {
        self.check(Op::Find)?;
        self.inner.find(request).await
    }

    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck> {
        self.check(Op::CreateIndex)?;
        self.inner.create_index(spec).await
    }
}

// =============================================================================
// Interleaving
// =============================================================================

#[derive(Debug, Default)]
pub struct YieldingStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn get(&self, id: &str) -> StoreResult<Document> {
        tokio::task::yield_now().await;
        self.inner.get(id).await
    }

    async fn put(&self, doc: Document) -> StoreResult<WriteAck> {
        tokio::task::yield_now().await;
        self.inner.put(doc).await
    }

    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck> {
        tokio::task::yield_now().await;
        self.inner.remove(id, rev).await
    }

    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse> {
        tokio::task::yield_now().await;
        self.inner.find(request).await
    }

    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck> {
        tokio::task::yield_now().await;
        self.inner.create_index(spec).await
    }
}

// =============================================================================
// Gateway helpers
// =============================================================================

/// Gateway over `store` with default config, indexes declared
pub async fn open(store: Arc<dyn DocumentStore>) -> (RecordGateway, Arc<MessageLog>) {
    open_with(store, &GatewayConfig::default()).await
}

pub async fn open_with(
    store: Arc<dyn DocumentStore>,
    config: &GatewayConfig,
) -> (RecordGateway, Arc<MessageLog>) {
    let log = Arc::new(MessageLog::new());
    let gateway = RecordGateway::open(store, log.clone(), config)
        .await
        .expect("gateway open");
    (gateway, log)
}
