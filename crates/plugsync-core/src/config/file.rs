//! Optional `plugsync.toml` settings file

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings file name looked up at the root
pub const CONFIG_FILE_NAME: &str = "plugsync.toml";

/// Values a root may override; everything is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Registry path, relative to the root
    #[serde(default)]
    pub registry: Option<String>,

    /// Manifest file name inside each plugin folder
    #[serde(default)]
    pub manifest: Option<String>,

    /// Extra folder names to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Abort instead of rebuilding when the registry cannot be parsed
    #[serde(default)]
    pub strict: Option<bool>,
}

/// Parse plugsync.toml from disk
pub fn parse_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse plugsync.toml content from string
pub fn parse_config_str(content: &str) -> Result<ConfigFile> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| anyhow::anyhow!("TOML parsing error: {}", e))?;

    if let Some(manifest) = &file.manifest {
        if manifest.is_empty() || manifest.contains(['/', '\\']) {
            anyhow::bail!("Manifest must be a plain file name, got '{}'", manifest);
        }
    }

    Ok(file)
}
