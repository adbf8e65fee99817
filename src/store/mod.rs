//! Document store seam
//!
//! The gateway talks to its persistence engine only through
//! [`DocumentStore`]. The engine provides document-level atomicity and
//! optimistic concurrency through revision tokens; there are no
//! cross-document transactions.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-process map, lost on drop
//! - [`FileStore`]: `MemoryStore` persisted to a JSON file after every mutation

mod document;
mod errors;
mod file;
mod memory;
mod selector;

use async_trait::async_trait;

pub use document::{
    revision_generation, Document, FindRequest, FindResponse, IndexAck, IndexOutcome, IndexSpec,
    WriteAck,
};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::{MemoryStore, StoreSnapshot};
pub use selector::{Condition, Selector};

/// Primitives a document store must provide.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the latest revision of a document.
    ///
    /// Returns `StoreError::NotFound` when no live document has this id.
    async fn get(&self, id: &str) -> StoreResult<Document>;

    /// Create or replace a document.
    ///
    /// A document without a revision may only create; a document with a
    /// revision must carry the latest one, otherwise `StoreError::Conflict`.
    async fn put(&self, doc: Document) -> StoreResult<WriteAck>;

    /// Delete a document at the given revision.
    async fn remove(&self, id: &str, rev: &str) -> StoreResult<WriteAck>;

    /// Return every document matching the selector.
    async fn find(&self, request: FindRequest) -> StoreResult<FindResponse>;

    /// Declare an index. Declaring an existing index is a no-op.
    async fn create_index(&self, spec: IndexSpec) -> StoreResult<IndexAck>;
}
