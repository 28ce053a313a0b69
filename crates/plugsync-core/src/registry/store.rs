//! Registry store for loading and saving registry.json.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;

use super::Registry;
use crate::error::SyncError;

/// Outcome of reading the registry file
#[derive(Debug)]
pub enum RegistryLoad {
    /// File parsed successfully
    Loaded(Registry),
    /// No registry file yet
    Missing,
    /// File exists but could not be read or parsed
    Recovered { error: SyncError },
}

#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry file without applying any fallback
    pub fn load(&self) -> RegistryLoad {
        if !self.path.exists() {
            return RegistryLoad::Missing;
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) => {
                return RegistryLoad::Recovered {
                    error: SyncError::RegistryRead {
                        path: self.path.clone(),
                        source,
                    },
                };
            }
        };
        match serde_json::from_str(&content) {
            Ok(registry) => RegistryLoad::Loaded(registry),
            Err(source) => RegistryLoad::Recovered {
                error: SyncError::RegistryParse {
                    path: self.path.clone(),
                    source,
                },
            },
        }
    }

    /// Load the registry, starting over from an empty one if it is unusable.
    ///
    /// With `strict` set, an unusable file is an error instead, so curated
    /// fields are never dropped silently.
    pub fn load_or_default(&self, strict: bool) -> anyhow::Result<Registry> {
        match self.load() {
            RegistryLoad::Loaded(registry) => {
                tracing::info!(
                    "Loaded registry with {} plugin(s) from {}",
                    registry.len(),
                    self.path.display()
                );
                Ok(registry)
            }
            RegistryLoad::Missing => {
                tracing::info!(
                    "No registry at {}, starting a new one",
                    self.path.display()
                );
                Ok(Registry::new())
            }
            RegistryLoad::Recovered { error } => {
                if strict {
                    return Err(anyhow::Error::new(error)
                        .context("Refusing to rebuild registry in strict mode"));
                }
                tracing::warn!("{}; rebuilding registry from manifests", error);
                Ok(Registry::new())
            }
        }
    }

    /// Write the registry atomically
    pub fn save(&self, registry: &Registry) -> anyhow::Result<()> {
        let content = to_pretty_json(registry)?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create registry directory: {}", parent.display())
        })?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write registry contents")?;
        tmp.flush().context("Failed to flush registry contents")?;
        tmp.persist(&self.path).map_err(|e| {
            anyhow::Error::new(e.error).context(format!(
                "Failed to write registry file: {}",
                self.path.display()
            ))
        })?;

        Ok(())
    }
}

/// Two-space indented JSON with a trailing newline
pub fn to_pretty_json(registry: &Registry) -> anyhow::Result<String> {
    let mut content =
        serde_json::to_string_pretty(registry).context("Failed to serialize registry")?;
    content.push('\n');
    Ok(content)
}
