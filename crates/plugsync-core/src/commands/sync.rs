//! Sync command implementation.
//!
//! Runs discovery, loads the previous registry, reconciles, and writes the
//! result back in a single pass.

use chrono::Utc;

use crate::config::SyncConfig;
use crate::discovery::discover;
use crate::reconcile::reconcile;
use crate::registry::RegistryStore;
use crate::report::SyncReport;

/// Options for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Reconcile and report without writing the registry
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Sync command orchestrator
#[derive(Debug)]
pub struct SyncCommand {
    config: SyncConfig,
    store: RegistryStore,
}

impl SyncCommand {
    /// Create a sync command for an explicit configuration
    pub fn new(config: SyncConfig) -> Self {
        let store = RegistryStore::new(config.registry_path());
        Self { config, store }
    }

    /// Discover manifests and rewrite the registry.
    ///
    /// Nothing is written unless every earlier step succeeded.
    pub fn run(&self, options: &SyncOptions) -> anyhow::Result<SyncReport> {
        tracing::info!("Scanning {}", self.config.root().display());
        let discovery = discover(&self.config)?;

        let previous = self.store.load_or_default(self.config.strict_registry())?;

        let result = reconcile(&previous, &discovery.manifests, Utc::now());

        if options.dry_run {
            tracing::info!("Dry run, not writing {}", self.store.path().display());
        } else {
            self.store.save(&result.registry)?;
            tracing::info!("Wrote {}", self.store.path().display());
        }

        let report = SyncReport {
            discovered: discovery.manifests.len(),
            failures: discovery.failures,
            duplicates: result.duplicates,
            plugins: result.changes,
            removed: result.removed,
            total: result.registry.len(),
            dry_run: options.dry_run,
        };
        tracing::info!("{}", report.summary());

        Ok(report)
    }
}
