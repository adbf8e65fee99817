//! Sequence allocation for record ids
//!
//! The counter document shares the record collection but is never a record.
//! Its value equals the number of allocations that committed.

mod allocator;

pub use allocator::{AllocationMode, CounterDoc, SequenceAllocator, SEQUENCE_KEY};
