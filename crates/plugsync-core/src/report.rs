//! Sync report types.

use std::fmt;

use serde::Serialize;

use crate::discovery::ManifestFailure;

/// How a plugin's entry compares to the previous registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PluginStatus {
    /// No previous entry with this id
    Added,
    /// Previous entry differs in at least one projected field
    Updated { fields: Vec<&'static str> },
    /// Projected fields match the previous entry
    Unchanged,
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Updated { .. } => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Classification of a single synced plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginChange {
    pub id: String,
    pub folder: String,
    #[serde(flatten)]
    pub status: PluginStatus,
}

/// A manifest skipped because an earlier folder already claimed its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateManifest {
    pub id: String,
    pub folder: String,
    pub kept_folder: String,
}

/// Summary of a sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Number of manifests parsed during discovery
    pub discovered: usize,

    /// Manifests that could not be read or parsed
    pub failures: Vec<ManifestFailure>,

    /// Manifests dropped because their id was already taken
    pub duplicates: Vec<DuplicateManifest>,

    /// One record per plugin in the new registry, in registry order
    pub plugins: Vec<PluginChange>,

    /// Ids dropped from the registry
    pub removed: Vec<String>,

    /// Plugin count of the written registry
    pub total: usize,

    /// Whether the registry file was left untouched
    pub dry_run: bool,
}

impl SyncReport {
    pub fn added(&self) -> impl Iterator<Item = &PluginChange> {
        self.plugins
            .iter()
            .filter(|change| change.status == PluginStatus::Added)
    }

    pub fn updated(&self) -> impl Iterator<Item = &PluginChange> {
        self.plugins
            .iter()
            .filter(|change| matches!(change.status, PluginStatus::Updated { .. }))
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &PluginChange> {
        self.plugins
            .iter()
            .filter(|change| change.status == PluginStatus::Unchanged)
    }

    /// Whether any entry was added, updated or removed
    pub fn has_changes(&self) -> bool {
        !self.removed.is_empty()
            || self
                .plugins
                .iter()
                .any(|change| change.status != PluginStatus::Unchanged)
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "Discovered {} manifest(s); registry has {} plugin(s) ({} added, {} updated, {} unchanged, {} removed)",
            self.discovered,
            self.total,
            self.added().count(),
            self.updated().count(),
            self.unchanged().count(),
            self.removed.len()
        )
    }
}
