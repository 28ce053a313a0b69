//! Manifest discovery
//!
//! Walks the immediate children of the plugin root and parses the manifest
//! inside each one. Nested folders are not searched.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::manifest::{DiscoveredManifest, parse_manifest};

/// A manifest that was found but could not be used
#[derive(Debug, Clone, Serialize)]
pub struct ManifestFailure {
    pub folder: String,
    pub path: PathBuf,
    pub message: String,
}

impl ManifestFailure {
    fn new(folder: String, error: &SyncError) -> Self {
        let message = match error {
            SyncError::ManifestRead { source, .. } => source.to_string(),
            SyncError::ManifestParse { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self {
            folder,
            path: error.path().to_path_buf(),
            message,
        }
    }
}

/// Result of scanning the plugin root
#[derive(Debug, Default)]
pub struct Discovery {
    /// Parsed manifests, sorted by folder name
    pub manifests: Vec<DiscoveredManifest>,

    /// Manifests skipped because they could not be read or parsed
    pub failures: Vec<ManifestFailure>,
}

/// Scan the root for plugin manifests.
///
/// Only a failure to enumerate the root itself is returned as an error.
/// Bad manifests are logged and collected in [`Discovery::failures`].
pub fn discover(config: &SyncConfig) -> anyhow::Result<Discovery> {
    let root = config.root();
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read plugin root: {}", root.display()))?;

    let mut discovery = Discovery::default();

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in: {}", root.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat: {}", entry.path().display()))?;
        if !file_type.is_dir() {
            continue;
        }

        let folder = entry.file_name().to_string_lossy().into_owned();
        if config.is_excluded(&folder) {
            tracing::debug!("Skipping excluded folder {}", folder);
            continue;
        }

        let manifest_path = entry.path().join(config.manifest_file_name());
        if !manifest_path.exists() {
            tracing::debug!("No manifest in {}", folder);
            continue;
        }

        match parse_manifest(&manifest_path) {
            Ok(metadata) => discovery.manifests.push(DiscoveredManifest {
                folder,
                path: manifest_path,
                metadata,
            }),
            Err(error) => {
                tracing::warn!("{}", error);
                discovery.failures.push(ManifestFailure::new(folder, &error));
            }
        }
    }

    discovery
        .manifests
        .sort_by(|a, b| a.folder.cmp(&b.folder));
    discovery.failures.sort_by(|a, b| a.folder.cmp(&b.folder));

    tracing::info!("Found {} plugin manifest(s)", discovery.manifests.len());

    Ok(discovery)
}
