//! Registry reconciliation
//!
//! Merges freshly discovered manifests into the previous registry. Manifests
//! always win, except for `official` and `license`, which are curated in the
//! registry and carried over by id.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use icu_collator::{Collator, CollatorOptions};

use crate::manifest::DiscoveredManifest;
use crate::registry::{Registry, RegistryEntry};
use crate::report::{DuplicateManifest, PluginChange, PluginStatus};

/// Output of [`reconcile`]
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The registry to persist
    pub registry: Registry,

    /// Per-plugin classification, in registry order
    pub changes: Vec<PluginChange>,

    /// Ids present before but not discovered this run
    pub removed: Vec<String>,

    /// Manifests skipped for reusing an id
    pub duplicates: Vec<DuplicateManifest>,
}

/// Build the next registry from `manifests` and the `previous` registry.
///
/// Every entry gets `now` as its `lastUpdated`, whether or not it changed.
/// If the same id appears in several manifests, the first one wins.
pub fn reconcile(
    previous: &Registry,
    manifests: &[DiscoveredManifest],
    now: DateTime<Utc>,
) -> Reconciliation {
    let existing: HashMap<&str, &RegistryEntry> = previous
        .plugins
        .iter()
        .map(|entry| (entry.id(), entry))
        .collect();

    let mut claimed: HashMap<&str, &str> = HashMap::new();
    let mut duplicates = Vec::new();
    let mut synced: Vec<(RegistryEntry, PluginChange)> = Vec::with_capacity(manifests.len());

    for manifest in manifests {
        if let Some(kept_folder) = claimed.get(manifest.id()) {
            tracing::warn!(
                "Duplicate plugin id '{}' in {} (already defined in {}), skipping",
                manifest.id(),
                manifest.folder,
                kept_folder
            );
            duplicates.push(DuplicateManifest {
                id: manifest.id().to_string(),
                folder: manifest.folder.clone(),
                kept_folder: kept_folder.to_string(),
            });
            continue;
        }
        claimed.insert(manifest.id(), &manifest.folder);

        let mut entry = RegistryEntry::new(manifest.metadata.clone(), now);
        let status = match existing.get(manifest.id()) {
            Some(prior) => {
                entry.official = prior.official;
                entry.license = prior.license.clone();

                let fields = entry.metadata.changed_fields(&prior.metadata);
                if fields.is_empty() {
                    tracing::info!("Unchanged: {}", entry.id());
                    PluginStatus::Unchanged
                } else {
                    tracing::info!("Updated: {} ({})", entry.id(), fields.join(", "));
                    PluginStatus::Updated { fields }
                }
            }
            None => {
                tracing::info!("New plugin: {}", entry.id());
                PluginStatus::Added
            }
        };

        let change = PluginChange {
            id: entry.id().to_string(),
            folder: manifest.folder.clone(),
            status,
        };
        synced.push((entry, change));
    }

    let collator = IdCollator::new();
    synced.sort_by(|(a, _), (b, _)| collator.compare(a.id(), b.id()));
    let (plugins, changes): (Vec<_>, Vec<_>) = synced.into_iter().unzip();

    let mut removed: Vec<String> = existing
        .keys()
        .filter(|id| !claimed.contains_key(*id))
        .map(|id| id.to_string())
        .collect();
    removed.sort_by(|a, b| collator.compare(a, b));
    for id in &removed {
        tracing::info!("Removed: {}", id);
    }

    Reconciliation {
        registry: Registry {
            version: previous.version.clone(),
            plugins,
            extra: previous.extra.clone(),
        },
        changes,
        removed,
        duplicates,
    }
}

/// Locale-aware ordering for plugin ids.
///
/// Uses the CLDR root collation, so punctuation, accents and case order the
/// way a locale-aware string comparison does (`a_b` before `a-b`, `éclair`
/// before `fan`, `a` before `A`). Ids the collator ranks equal fall back to
/// code point order so the sort stays total.
pub struct IdCollator {
    collator: Option<Collator>,
}

impl IdCollator {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!("Collation data unavailable, sorting by code point: {}", err);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let ordering = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => Ordering::Equal,
        };
        ordering.then_with(|| a.cmp(b))
    }
}

impl Default for IdCollator {
    fn default() -> Self {
        Self::new()
    }
}
