//! Observability for the gateway
//!
//! - Structured logging (JSON, one line per event)
//! - Monotonic counters
//!
//! Observability is read-only: nothing here changes what an operation returns.
//!
//! ```ignore
//! use docgate::observability::{Event, Logger};
//!
//! Logger::event(Event::GatewayOpen, &[("store", "memory")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{GatewayMetrics, MetricsSnapshot};
