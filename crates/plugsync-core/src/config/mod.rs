//! Sync configuration
//!
//! Every path the sync touches is carried explicitly in [`SyncConfig`]
//! so each stage can run against any directory, including temporary
//! fixtures in tests.

pub mod file;

use std::path::{Path, PathBuf};

pub use file::{CONFIG_FILE_NAME, ConfigFile, parse_config_file, parse_config_str};

/// Registry file written at the root by default
pub const DEFAULT_REGISTRY_FILE: &str = "registry.json";

/// Manifest file looked up inside each plugin folder
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Folders starting with this prefix are never scanned
pub const HIDDEN_PREFIX: &str = ".";

/// Dependency cache folder skipped during discovery
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    root: PathBuf,
    registry_path: PathBuf,
    manifest_file_name: String,
    excluded_dirs: Vec<String>,
    hidden_prefix: String,
    strict_registry: bool,
}

impl SyncConfig {
    /// Create a config rooted at `root` with default file names
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let registry_path = root.join(DEFAULT_REGISTRY_FILE);
        Self {
            root,
            registry_path,
            manifest_file_name: DEFAULT_MANIFEST_FILE.to_string(),
            excluded_dirs: vec![DEPENDENCY_CACHE_DIR.to_string()],
            hidden_prefix: HIDDEN_PREFIX.to_string(),
            strict_registry: false,
        }
    }

    /// Config rooted at the working directory, including its settings file
    pub fn from_current_dir() -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        Self::load(root)
    }

    /// Build a config for `root`, applying `plugsync.toml` when present
    pub fn load(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config = Self::new(root);
        let path = config.root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(config);
        }
        let file = parse_config_file(&path)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config.apply(&file))
    }

    /// Overlay values from a parsed settings file
    pub fn apply(mut self, file: &ConfigFile) -> Self {
        if let Some(registry) = &file.registry {
            self.registry_path = self.root.join(registry);
        }
        if let Some(manifest) = &file.manifest {
            self.manifest_file_name = manifest.clone();
        }
        for dir in &file.exclude {
            self = self.with_excluded_dir(dir.clone());
        }
        if let Some(strict) = file.strict {
            self.strict_registry = strict;
        }
        self
    }

    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.registry_path = if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        };
        self
    }

    pub fn with_manifest_file_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_file_name = name.into();
        self
    }

    pub fn with_excluded_dir(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.excluded_dirs.contains(&name) {
            self.excluded_dirs.push(name);
        }
        self
    }

    pub fn with_strict_registry(mut self, strict: bool) -> Self {
        self.strict_registry = strict;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn manifest_file_name(&self) -> &str {
        &self.manifest_file_name
    }

    pub fn excluded_dirs(&self) -> &[String] {
        &self.excluded_dirs
    }

    pub fn strict_registry(&self) -> bool {
        self.strict_registry
    }

    /// Whether a child folder of the root is skipped during discovery
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with(&self.hidden_prefix) || self.excluded_dirs.iter().any(|dir| dir == name)
    }
}
