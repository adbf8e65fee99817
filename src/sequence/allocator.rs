//! Sequence allocator
//!
//! Mints increasing integer ids from a singleton counter document stored
//! under [`SEQUENCE_KEY`]. The store has no atomic increment, so each
//! allocation is read, increment, write.
//!
//! # Modes
//!
//! - `Serialized`: allocations from this allocator run one at a time, and a
//!   revision conflict on the counter (another writer got there first) is
//!   retried up to the configured budget.
//! - `Unguarded`: no lock, no retry. Two racing allocations read the same
//!   value; the store rejects the second write and that conflict is returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::gateway::{GatewayError, GatewayResult};
use crate::observability::{Event, GatewayMetrics, Logger};
use crate::store::{Document, DocumentStore, StoreError};

/// Reserved id of the counter document
pub const SEQUENCE_KEY: &str = "seq";

const VALUE_FIELD: &str = "value";

/// How concurrent allocations are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    #[default]
    Serialized,
    Unguarded,
}

impl AllocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationMode::Serialized => "serialized",
            AllocationMode::Unguarded => "unguarded",
        }
    }
}

/// The counter document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDoc {
    /// Number of committed allocations
    pub value: u64,
    pub rev: Option<String>,
}

impl CounterDoc {
    fn from_document(doc: Document) -> GatewayResult<Self> {
        let value = match doc.body.get(VALUE_FIELD) {
            Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
                GatewayError::schema(&doc.id, "value is not a non-negative integer")
            })?,
            _ => return Err(GatewayError::schema(&doc.id, "missing value")),
        };
        Ok(Self {
            value,
            rev: doc.rev,
        })
    }

    fn to_document(&self) -> Document {
        let mut doc = Document::new(SEQUENCE_KEY).with_field(VALUE_FIELD, self.value);
        doc.rev = self.rev.clone();
        doc
    }
}

pub struct SequenceAllocator {
    store: Arc<dyn DocumentStore>,
    mode: AllocationMode,
    max_conflict_retries: u32,
    lock: Mutex<()>,
    metrics: Arc<GatewayMetrics>,
}

impl SequenceAllocator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mode: AllocationMode,
        max_conflict_retries: u32,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            store,
            mode,
            max_conflict_retries,
            lock: Mutex::new(()),
            metrics,
        }
    }

    /// Increment and persist the counter, returning its new state.
    ///
    /// The first allocation on a fresh store returns `value == 1`.
    pub async fn allocate(&self) -> GatewayResult<CounterDoc> {
        match self.mode {
            AllocationMode::Unguarded => self.allocate_once().await,
            AllocationMode::Serialized => {
                let _guard = self.lock.lock().await;
                let mut retries = 0;
                loop {
                    match self.allocate_once().await {
                        Err(e) if e.is_conflict() => {
                            if retries >= self.max_conflict_retries {
                                return Err(GatewayError::SequenceContended(retries));
                            }
                            retries += 1;
                            self.metrics.increment_allocation_retries();
                            Logger::event(
                                Event::SequenceConflictRetry,
                                &[("attempt", retries.to_string().as_str())],
                            );
                        }
                        other => return other,
                    }
                }
            }
        }
    }

    /// Read the current counter value without allocating
    pub async fn current(&self) -> GatewayResult<u64> {
        match self.store.get(SEQUENCE_KEY).await {
            Ok(doc) => Ok(CounterDoc::from_document(doc)?.value),
            Err(StoreError::NotFound(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    async fn allocate_once(&self) -> GatewayResult<CounterDoc> {
        let mut created = false;
        loop {
            match self.store.get(SEQUENCE_KEY).await {
                Ok(doc) => {
                    let mut counter = CounterDoc::from_document(doc)?;
                    counter.value = counter
                        .value
                        .checked_add(1)
                        .ok_or(GatewayError::SequenceExhausted)?;

                    let ack = self.store.put(counter.to_document()).await?;
                    counter.rev = Some(ack.rev);

                    self.metrics.increment_allocations();
                    Logger::event(
                        Event::SequenceAllocated,
                        &[("value", counter.value.to_string().as_str())],
                    );
                    return Ok(counter);
                }
                // First use: create the counter, then run the allocation again
                Err(StoreError::NotFound(_)) if !created => {
                    self.create_counter().await?;
                    created = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Seeds the counter at 0 so the allocation that follows yields 1 and the
    /// stored value always equals the number of committed allocations.
    async fn create_counter(&self) -> GatewayResult<()> {
        let fresh = CounterDoc {
            value: 0,
            rev: None,
        };
        match self.store.put(fresh.to_document()).await {
            Ok(_) => {
                Logger::event(Event::SequenceCreated, &[("id", SEQUENCE_KEY)]);
                Ok(())
            }
            // Someone else created it between our read and write
            Err(StoreError::Conflict(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
