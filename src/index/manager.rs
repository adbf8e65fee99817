//! Index Manager
//!
//! Declares the indexes record queries rely on:
//!
//! - `["kind"]` for listing
//! - `["kind", "name"]` for name search
//!
//! Both declarations are issued together and awaited jointly. Declaring an
//! index that already exists is a no-op, so this runs on every startup.

use std::sync::Arc;

use futures_util::future::try_join;

use crate::gateway::record::{KIND_FIELD, NAME_FIELD};
use crate::gateway::GatewayResult;
use crate::observability::{Event, GatewayMetrics, Logger};
use crate::store::{DocumentStore, IndexAck, IndexSpec};

pub struct IndexManager {
    store: Arc<dyn DocumentStore>,
    metrics: Arc<GatewayMetrics>,
}

impl IndexManager {
    pub fn new(store: Arc<dyn DocumentStore>, metrics: Arc<GatewayMetrics>) -> Self {
        Self { store, metrics }
    }

    /// The declarations, in the order their acks are returned
    pub fn declarations() -> [IndexSpec; 2] {
        [
            IndexSpec::new([KIND_FIELD]),
            IndexSpec::new([KIND_FIELD, NAME_FIELD]),
        ]
    }

    /// Declare every index. Fails if either declaration fails.
    pub async fn ensure_indexes(&self) -> GatewayResult<Vec<IndexAck>> {
        Logger::event(Event::IndexEnsureBegin, &[]);

        let [by_kind, by_kind_name] = Self::declarations();
        let (a, b) = try_join(
            self.store.create_index(by_kind),
            self.store.create_index(by_kind_name),
        )
        .await?;

        let acks = vec![a, b];
        for ack in &acks {
            Logger::event(
                Event::IndexDeclared,
                &[("index", ack.name.as_str()), ("result", ack.result.as_str())],
            );
        }
        self.metrics.add_index_declarations(acks.len() as u64);

        Logger::event(Event::IndexEnsureComplete, &[("count", "2")]);
        Ok(acks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IndexOutcome, MemoryStore};

    #[tokio::test]
    async fn test_declares_both_indexes() {
        let store = Arc::new(MemoryStore::new());
        let manager = IndexManager::new(store.clone(), Arc::new(GatewayMetrics::new()));

        let acks = manager.ensure_indexes().await.unwrap();
        assert_eq!(acks.len(), 2);
        assert_eq!(acks[0].name, "idx-kind");
        assert_eq!(acks[1].name, "idx-kind-name");
        assert!(acks.iter().all(|a| a.result == IndexOutcome::Created));
        assert_eq!(store.indexes().await, IndexManager::declarations().to_vec());
    }

    #[tokio::test]
    async fn test_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(GatewayMetrics::new());
        let manager = IndexManager::new(store.clone(), metrics.clone());

        manager.ensure_indexes().await.unwrap();
        let acks = manager.ensure_indexes().await.unwrap();
        assert!(acks.iter().all(|a| a.result == IndexOutcome::Exists));
        assert_eq!(store.indexes().await.len(), 2);
        assert_eq!(metrics.snapshot().index_declarations, 4);
    }
}
