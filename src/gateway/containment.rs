//! Error containment
//!
//! Wraps a fallible gateway operation. On failure the error is written to
//! the diagnostic log, a `"<operation> failed: <message>"` notification is
//! sent, and the caller receives the fallback value instead of the error.

use std::future::Future;
use std::sync::Arc;

use super::errors::{GatewayError, GatewayResult};
use super::notify::Notifier;
use crate::observability::{Event, GatewayMetrics, Logger};

pub struct ErrorContainment {
    notifier: Arc<dyn Notifier>,
    metrics: Arc<GatewayMetrics>,
    prefix: String,
}

impl ErrorContainment {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        metrics: Arc<GatewayMetrics>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            metrics,
            prefix: prefix.into(),
        }
    }

    /// Await `operation`, substituting `fallback` if it fails
    pub async fn contain<T, F>(&self, label: &str, fallback: T, operation: F) -> T
    where
        F: Future<Output = GatewayResult<T>>,
    {
        match operation.await {
            Ok(value) => value,
            Err(err) => {
                self.report(label, &err);
                fallback
            }
        }
    }

    /// Log and notify a failure that is being contained
    pub fn report(&self, label: &str, err: &GatewayError) {
        self.metrics.increment_contained_failures();
        let message = err.to_string();
        Logger::event(
            Event::OperationContained,
            &[
                ("operation", label),
                ("code", err.code()),
                ("error", message.as_str()),
            ],
        );
        self.notify(&format!("{} failed: {}", label, message));
    }

    /// Send a prefixed notification
    pub fn notify(&self, message: &str) {
        self.notifier.add(&format!("{}: {}", self.prefix, message));
    }
}
