//! Manifest field projection shared with registry entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields copied from a manifest into its registry entry.
///
/// Absent fields stay absent on both sides: the entry is a sparse
/// projection, not a fixed-shape record. Values are copied as found, so a
/// manifest with `"author": {"name": ...}` or a numeric `version` is kept
/// rather than rejected. Only `id` must be a string. Unknown manifest keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    /// Plugin identifier (merge key)
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,

    /// Minimum compatible Noctalia version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_noctalia_version: Option<Value>,

    /// Ordered labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

impl PluginMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Names of projected fields whose values differ from `other`
    pub fn changed_fields(&self, other: &PluginMetadata) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.id != other.id {
            changed.push("id");
        }
        if self.name != other.name {
            changed.push("name");
        }
        if self.version != other.version {
            changed.push("version");
        }
        if self.author != other.author {
            changed.push("author");
        }
        if self.description != other.description {
            changed.push("description");
        }
        if self.repository != other.repository {
            changed.push("repository");
        }
        if self.min_noctalia_version != other.min_noctalia_version {
            changed.push("minNoctaliaVersion");
        }
        if self.tags != other.tags {
            changed.push("tags");
        }
        changed
    }
}
