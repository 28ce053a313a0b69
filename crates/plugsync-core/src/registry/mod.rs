//! Persisted plugin registry
//!
//! Defines the registry document and the store that loads and writes it.

pub mod schema;
pub mod store;

pub use schema::{DEFAULT_LICENSE, REGISTRY_VERSION, Registry, RegistryEntry};
pub use store::{RegistryLoad, RegistryStore, to_pretty_json};
