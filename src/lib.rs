//! docgate - a record gateway over a local document store
//!
//! Records get unique, increasing integer ids from a counter document kept
//! in the same store, queries run against declared indexes, and store
//! failures are contained per operation instead of reaching the caller.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod index;
pub mod observability;
pub mod sequence;
pub mod store;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, GatewayResult, NewRecord, Record, RecordGateway};
