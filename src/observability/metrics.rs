//! Gateway counters
//!
//! Counters only, monotonic, reset on process start. Relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct GatewayMetrics {
    operations: AtomicU64,
    contained_failures: AtomicU64,
    propagated_failures: AtomicU64,
    allocations: AtomicU64,
    allocation_retries: AtomicU64,
    index_declarations: AtomicU64,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub operations: u64,
    pub contained_failures: u64,
    pub propagated_failures: u64,
    pub allocations: u64,
    pub allocation_retries: u64,
    pub index_declarations: u64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_operations(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_contained_failures(&self) {
        self.contained_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_propagated_failures(&self) {
        self.propagated_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_allocations(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_allocation_retries(&self) {
        self.allocation_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_index_declarations(&self, n: u64) {
        self.index_declarations.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            operations: self.operations.load(Ordering::Relaxed),
            contained_failures: self.contained_failures.load(Ordering::Relaxed),
            propagated_failures: self.propagated_failures.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            allocation_retries: self.allocation_retries.load(Ordering::Relaxed),
            index_declarations: self.index_declarations.load(Ordering::Relaxed),
        }
    }
}
