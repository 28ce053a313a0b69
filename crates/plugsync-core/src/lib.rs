//! Plugsync Core Library
//!
//! Scans a plugin tree for per-plugin manifests and reconciles them into a
//! persisted registry, keeping locally curated fields intact.

pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod reconcile;
pub mod registry;
pub mod report;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigFile, SyncConfig};

    // Manifests and discovery
    pub use crate::discovery::{Discovery, ManifestFailure, discover};
    pub use crate::manifest::{DiscoveredManifest, PluginMetadata};

    // Registry
    pub use crate::registry::{Registry, RegistryEntry, RegistryLoad, RegistryStore};

    // Reconciliation
    pub use crate::reconcile::{Reconciliation, reconcile};
    pub use crate::report::{PluginChange, PluginStatus, SyncReport};

    // Commands
    pub use crate::commands::{SyncCommand, SyncOptions};

    pub use crate::error::SyncError;
}
