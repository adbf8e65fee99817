//! Record gateway
//!
//! # Operations
//!
//! | op       | on failure                              |
//! |----------|-----------------------------------------|
//! | `list`   | `Err` returned, logged                  |
//! | `get`    | `None`, logged and notified             |
//! | `add`    | `Err` returned, logged                  |
//! | `update` | `None`, logged and notified             |
//! | `delete` | `None`, logged and notified             |
//! | `search` | empty `Vec`, logged and notified        |
//!
//! `try_get`, `try_update`, `try_delete` and `try_search` are the same
//! operations without containment, for callers that pick their own fallback.
//!
//! The sequence counter shares the collection with records; it is filtered
//! out of every query result by id.

use std::sync::Arc;

use super::containment::ErrorContainment;
use super::errors::{GatewayError, GatewayResult};
use super::notify::Notifier;
use super::record::{Kind, NewRecord, Record, RecordRef, KIND_FIELD, NAME_FIELD};
use crate::config::GatewayConfig;
use crate::index::IndexManager;
use crate::observability::{Event, GatewayMetrics, Logger, MetricsSnapshot};
use crate::sequence::{SequenceAllocator, SEQUENCE_KEY};
use crate::store::{DocumentStore, FindRequest, IndexAck, Selector, WriteAck};

pub struct RecordGateway {
    store: Arc<dyn DocumentStore>,
    allocator: SequenceAllocator,
    indexes: IndexManager,
    containment: ErrorContainment,
    metrics: Arc<GatewayMetrics>,
}

impl RecordGateway {
    /// Build a gateway without touching the store
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        config: &GatewayConfig,
    ) -> Self {
        let metrics = Arc::new(GatewayMetrics::new());
        Self {
            allocator: SequenceAllocator::new(
                store.clone(),
                config.allocation_mode,
                config.max_conflict_retries,
                metrics.clone(),
            ),
            indexes: IndexManager::new(store.clone(), metrics.clone()),
            containment: ErrorContainment::new(
                notifier,
                metrics.clone(),
                config.notify_prefix.clone(),
            ),
            store,
            metrics,
        }
    }

    /// Build a gateway and declare its indexes
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        config: &GatewayConfig,
    ) -> GatewayResult<Self> {
        let gateway = Self::new(store, notifier, config);
        gateway.ensure_indexes().await?;
        Logger::event(
            Event::GatewayOpen,
            &[
                ("allocation_mode", config.allocation_mode.as_str()),
                ("notify_prefix", config.notify_prefix.as_str()),
            ],
        );
        Ok(gateway)
    }

    pub async fn ensure_indexes(&self) -> GatewayResult<Vec<IndexAck>> {
        self.indexes.ensure_indexes().await
    }

    pub fn allocator(&self) -> &SequenceAllocator {
        &self.allocator
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// All records, in store order
    pub async fn list(&self) -> GatewayResult<Vec<Record>> {
        self.metrics.increment_operations();
        self.containment.notify("fetched records");

        let selector = Selector::new().eq(KIND_FIELD, Kind::Record.as_str());
        self.query(selector)
            .await
            .map_err(|e| self.propagate("list", e))
    }

    pub async fn try_get(&self, id: &str) -> GatewayResult<Record> {
        let doc = self.store.get(id).await?;
        Record::from_document(doc)
    }

    /// Fetch one record; `None` on any failure, not-found included
    pub async fn get(&self, id: &str) -> Option<Record> {
        self.metrics.increment_operations();
        let label = format!("get id={}", id);
        self.containment
            .contain(&label, None, async {
                let record = self.try_get(id).await?;
                self.complete(&format!("fetched record id={}", id));
                Ok::<_, GatewayError>(Some(record))
            })
            .await
    }

    /// Allocate an id and persist a new record
    pub async fn add(&self, record: NewRecord) -> GatewayResult<Record> {
        self.metrics.increment_operations();

        let result = async {
            let counter = self.allocator.allocate().await?;
            let mut created = Record::new(counter.value.to_string(), record.name);
            let ack = self.store.put(created.to_document()).await?;
            created.rev = Some(ack.rev);
            Ok::<_, GatewayError>(created)
        }
        .await;

        match result {
            Ok(created) => {
                self.complete(&format!("added record w/ id={}", created.id));
                Ok(created)
            }
            Err(e) => Err(self.propagate("add", e)),
        }
    }

    /// Overwrite a record at its current revision
    pub async fn try_update(&self, record: &Record) -> GatewayResult<Record> {
        guard_reserved(&record.id)?;
        let ack = self.store.put(record.to_document()).await?;

        let mut updated = record.clone();
        updated.rev = Some(ack.rev);
        Ok(updated)
    }

    /// Overwrite a record; `None` on failure, including a stale revision
    pub async fn update(&self, record: &Record) -> Option<Record> {
        self.metrics.increment_operations();
        self.containment
            .contain("update", None, async {
                let updated = self.try_update(record).await?;
                self.complete(&format!("updated record id={}", record.id));
                Ok::<_, GatewayError>(Some(updated))
            })
            .await
    }

    /// Delete at the latest revision, whatever revision the caller holds
    pub async fn try_delete<'a>(
        &self,
        target: impl Into<RecordRef<'a>>,
    ) -> GatewayResult<WriteAck> {
        let target: RecordRef<'a> = target.into();
        let id = target.id();
        guard_reserved(id)?;

        let doc = self.store.get(id).await?;
        let rev = doc
            .rev
            .ok_or_else(|| GatewayError::schema(id, "stored document has no revision"))?;
        Logger::trace(
            Event::OperationComplete,
            &[("op", "delete_lookup"), ("id", id), ("rev", rev.as_str())],
        );

        Ok(self.store.remove(id, &rev).await?)
    }

    /// Delete a record given the record or its id; `None` on failure
    pub async fn delete<'a>(&self, target: impl Into<RecordRef<'a>>) -> Option<WriteAck> {
        self.metrics.increment_operations();
        let target: RecordRef<'a> = target.into();
        let id = target.id();
        self.containment
            .contain("delete", None, async {
                let ack = self.try_delete(id).await?;
                self.complete(&format!("deleted record id={}", id));
                Ok::<_, GatewayError>(Some(ack))
            })
            .await
    }

    /// Records whose name matches `term`, a case-insensitive regular expression.
    ///
    /// A blank term matches nothing and never reaches the store.
    pub async fn try_search(&self, term: &str) -> GatewayResult<Vec<Record>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }

        let selector = Selector::new()
            .eq(KIND_FIELD, Kind::Record.as_str())
            .regex(NAME_FIELD, term, true)?;
        self.query(selector).await
    }

    /// Search by name; empty on failure
    pub async fn search(&self, term: &str) -> Vec<Record> {
        if term.trim().is_empty() {
            return Vec::new();
        }

        self.metrics.increment_operations();
        self.containment
            .contain("search", Vec::new(), async {
                let found = self.try_search(term).await?;
                if found.is_empty() {
                    self.complete(&format!("no records matching \"{}\"", term));
                } else {
                    self.complete(&format!("found records matching \"{}\"", term));
                }
                Ok::<_, GatewayError>(found)
            })
            .await
    }

    async fn query(&self, selector: Selector) -> GatewayResult<Vec<Record>> {
        let response = self.store.find(FindRequest::new(selector.clone())).await?;

        if let Some(warning) = &response.warning {
            Logger::event(
                Event::StoreWarning,
                &[
                    ("selector", selector.to_json().to_string().as_str()),
                    ("warning", warning.as_str()),
                ],
            );
        }

        // Undecodable documents are skipped, not fatal to the whole query
        let records = response
            .docs
            .into_iter()
            .filter(|doc| doc.id != SEQUENCE_KEY)
            .filter_map(|doc| {
                let id = doc.id.clone();
                match Record::from_document(doc) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        Logger::warn(
                            Event::RecordSkipped,
                            &[("id", id.as_str()), ("reason", e.to_string().as_str())],
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(records)
    }

    fn complete(&self, message: &str) {
        Logger::event(Event::OperationComplete, &[("message", message)]);
        self.containment.notify(message);
    }

    fn propagate(&self, label: &str, err: GatewayError) -> GatewayError {
        self.metrics.increment_propagated_failures();
        Logger::event(
            Event::OperationFailed,
            &[
                ("operation", label),
                ("code", err.code()),
                ("error", err.to_string().as_str()),
            ],
        );
        err
    }
}

fn guard_reserved(id: &str) -> GatewayResult<()> {
    if id == SEQUENCE_KEY {
        return Err(GatewayError::ReservedId(id.to_string()));
    }
    Ok(())
}

