//! Command implementations
//!
//! High-level entry points composed from discovery, the registry store and
//! reconciliation.

pub mod sync;

pub use sync::{SyncCommand, SyncOptions};
