//! Plugsync - plugin registry synchronizer
//!
//! Usage:
//!   plugsync                   # Sync ./registry.json from ./*/manifest.json
//!   plugsync --dry-run         # Report what would change
//!   plugsync --format json     # Machine-readable report

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plugsync_core::commands::{SyncCommand, SyncOptions};
use plugsync_core::config::SyncConfig;
use plugsync_core::report::{PluginStatus, SyncReport};

#[derive(Parser)]
#[command(name = "plugsync")]
#[command(about = "Sync a plugin registry from per-plugin manifests", long_about = None)]
struct Cli {
    /// Plugin root to scan (defaults to the working directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Registry file to update (relative paths resolve against the root)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Manifest file name inside each plugin folder
    #[arg(long)]
    manifest: Option<String>,

    /// Fail instead of rebuilding when the registry cannot be parsed
    #[arg(long)]
    strict: bool,

    /// Reconcile and report without writing the registry
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only show skipped manifests
    Quiet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "plugsync=debug,plugsync_core=debug,info"
    } else {
        "plugsync=info,plugsync_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = build_config(&cli)?;
    tracing::debug!("Using registry {}", config.registry_path().display());

    let command = SyncCommand::new(config);
    let options = SyncOptions::new().with_dry_run(cli.dry_run);
    let report = command.run(&options)?;

    render_report(&report, cli.format)
}

/// Print the report; skipped manifests never turn a finished run into a failure
fn render_report(report: &SyncReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_report_table(report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Quiet => print_issues(report),
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SyncConfig> {
    let mut config = match &cli.root {
        Some(root) => SyncConfig::load(root)?,
        None => SyncConfig::from_current_dir()?,
    };
    if let Some(registry) = &cli.registry {
        config = config.with_registry_path(registry);
    }
    if let Some(manifest) = &cli.manifest {
        config = config.with_manifest_file_name(manifest);
    }
    if cli.strict {
        config = config.with_strict_registry(true);
    }
    Ok(config)
}

fn print_report_table(report: &SyncReport) {
    if !report.plugins.is_empty() {
        println!("{:<32} {:<24} STATUS", "ID", "FOLDER");
        for change in &report.plugins {
            let status = match &change.status {
                PluginStatus::Updated { fields } => format!("updated ({})", fields.join(", ")),
                other => other.to_string(),
            };
            println!("{:<32} {:<24} {}", change.id, change.folder, status);
        }
    }
    for id in &report.removed {
        println!("{:<32} {:<24} removed", id, "-");
    }

    print_issues(report);

    println!();
    println!("{}", report.summary());
    if report.dry_run {
        println!("Dry run: registry not written");
    }
}

fn print_issues(report: &SyncReport) {
    for failure in &report.failures {
        eprintln!(
            "✗ Skipped {}: {}",
            failure.path.display(),
            failure.message
        );
    }
    for duplicate in &report.duplicates {
        eprintln!(
            "✗ Skipped {}: id '{}' already defined in {}",
            duplicate.folder, duplicate.id, duplicate.kept_folder
        );
    }
}
