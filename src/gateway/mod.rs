//! Record gateway
//!
//! CRUD and search over records stored in a [`DocumentStore`], with ids from
//! the [`SequenceAllocator`] and store failures contained per operation.
//!
//! [`DocumentStore`]: crate::store::DocumentStore
//! [`SequenceAllocator`]: crate::sequence::SequenceAllocator

mod containment;
mod errors;
#[allow(clippy::module_inception)]
mod gateway;
mod notify;
pub mod record;

pub use containment::ErrorContainment;
pub use errors::{GatewayError, GatewayResult};
pub use gateway::RecordGateway;
pub use notify::{ConsoleNotifier, MessageLog, Notifier};
pub use record::{Kind, NewRecord, Record, RecordRef};
