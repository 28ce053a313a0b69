//! Per-plugin manifest documents
//!
//! A manifest lives at `<plugin folder>/manifest.json` and is the source of
//! truth for everything in a registry entry except the curated fields.

pub mod schema;

use std::path::{Path, PathBuf};

pub use schema::PluginMetadata;

use crate::error::SyncError;

/// A parsed manifest tagged with the folder it was found in
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredManifest {
    /// Source folder name (never persisted)
    pub folder: String,

    /// Path of the manifest file
    pub path: PathBuf,

    /// Projected metadata
    pub metadata: PluginMetadata,
}

impl DiscoveredManifest {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

/// Read and parse a manifest file
pub fn parse_manifest(path: &Path) -> Result<PluginMetadata, SyncError> {
    let content = std::fs::read_to_string(path).map_err(|source| SyncError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_manifest_str(&content).map_err(|source| SyncError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse manifest content from string
pub fn parse_manifest_str(content: &str) -> Result<PluginMetadata, serde_json::Error> {
    serde_json::from_str(content)
}
