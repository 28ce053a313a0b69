//! Recoverable errors raised while syncing the registry.
//!
//! These never abort a run on their own: discovery and the registry store
//! convert them into log lines plus a fallback value. Only failures to
//! enumerate the plugin root escape as `anyhow` errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read registry {}: {source}", .path.display())]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry {}: {source}", .path.display())]
    RegistryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// File the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::ManifestRead { path, .. }
            | Self::ManifestParse { path, .. }
            | Self::RegistryRead { path, .. }
            | Self::RegistryParse { path, .. } => path,
        }
    }
}
