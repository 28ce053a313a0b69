//! Registry document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::manifest::PluginMetadata;

/// Version stamped on freshly created registries
pub const REGISTRY_VERSION: u32 = 1;

/// License assumed for plugins that have not been curated
pub const DEFAULT_LICENSE: &str = "MIT";

/// The aggregated plugin catalog.
///
/// Loading is lenient so that one odd entry never costs the curation of
/// the others: entries without a string `id` are dropped on their own, and
/// curated fields of an unexpected type fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    /// Format version, passed through untouched
    #[serde(default = "default_version")]
    pub version: Value,

    /// Entries sorted by id
    #[serde(default, deserialize_with = "lenient_entries")]
    pub plugins: Vec<RegistryEntry>,

    /// Unknown top-level keys, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            version: default_version(),
            plugins: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Get an entry by id
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.plugins.iter().find(|entry| entry.metadata.id == id)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// One plugin's row: its manifest projection plus curated fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    #[serde(flatten)]
    pub metadata: PluginMetadata,

    /// Curated locally; never taken from a manifest
    #[serde(default, deserialize_with = "lenient_official")]
    pub official: bool,

    /// Curated locally; never taken from a manifest
    #[serde(default = "default_license", deserialize_with = "lenient_license")]
    pub license: String,

    /// Time of the last sync that saw this plugin.
    ///
    /// Always set on entries produced by a sync; `None` only for stored
    /// entries whose timestamp was missing or unreadable.
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    /// Entry for a plugin that has never been curated
    pub fn new(metadata: PluginMetadata, last_updated: DateTime<Utc>) -> Self {
        Self {
            metadata,
            official: false,
            license: default_license(),
            last_updated: Some(last_updated),
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

fn default_version() -> Value {
    Value::from(REGISTRY_VERSION)
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<RegistryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    let entries: Vec<RegistryEntry> = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Ignoring registry entry #{}: {}", index, err);
                None
            }
        })
        .collect();
    Ok(entries)
}

fn lenient_official<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_license<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(license) => Ok(license),
        _ => Ok(default_license()),
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-01-31T09:15:00.000Z`
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    /// Unreadable timestamps become `None`; they are replaced on the next sync
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Value::deserialize(deserializer)? {
            Value::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            _ => None,
        };
        Ok(parsed)
    }
}
