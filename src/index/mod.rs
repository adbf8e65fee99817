//! Query index declarations
//!
//! Indexes are configuration, not runtime entities: the store maintains
//! them, the gateway only declares which ones must exist before queries run.

mod manager;

pub use manager::IndexManager;
