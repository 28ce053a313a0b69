//! End-to-end tests for the sync command against temporary plugin trees.

use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use plugsync_core::commands::{SyncCommand, SyncOptions};
use plugsync_core::config::SyncConfig;
use plugsync_core::report::PluginStatus;

fn write_manifest(root: &Path, folder: &str, manifest: &Value) {
    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("manifest.json"),
        serde_json::to_vec_pretty(manifest).unwrap(),
    )
    .unwrap();
}

fn write_registry(root: &Path, registry: &Value) {
    std::fs::write(
        root.join("registry.json"),
        serde_json::to_vec_pretty(registry).unwrap(),
    )
    .unwrap();
}

fn read_registry(root: &Path) -> Value {
    let content = std::fs::read_to_string(root.join("registry.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Registry with every `lastUpdated` removed
fn without_timestamps(mut registry: Value) -> Value {
    if let Some(plugins) = registry["plugins"].as_array_mut() {
        for plugin in plugins {
            plugin.as_object_mut().unwrap().remove("lastUpdated");
        }
    }
    registry
}

fn run(root: &Path) -> plugsync_core::report::SyncReport {
    SyncCommand::new(SyncConfig::new(root))
        .run(&SyncOptions::new())
        .unwrap()
}

#[test]
fn empty_root_without_registry_writes_empty_registry() {
    let temp = TempDir::new().unwrap();

    let report = run(temp.path());

    assert_eq!(report.discovered, 0);
    assert_eq!(report.total, 0);
    let written = std::fs::read_to_string(temp.path().join("registry.json")).unwrap();
    assert_eq!(written, "{\n  \"version\": 1,\n  \"plugins\": []\n}\n");
}

#[test]
fn mixed_tree_preserves_curation_and_drops_stale_entries() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "a",
        &json!({"id": "a", "name": "Alpha", "version": "1.0.0"}),
    );
    std::fs::create_dir_all(temp.path().join("b")).unwrap();
    std::fs::create_dir_all(temp.path().join("c")).unwrap();
    std::fs::write(temp.path().join("c").join("manifest.json"), "{ not json").unwrap();
    write_registry(
        temp.path(),
        &json!({
            "version": 1,
            "plugins": [
                {"id": "a", "license": "GPL", "lastUpdated": "2024-01-01T00:00:00.000Z"},
                {"id": "z", "official": true, "license": "MIT", "lastUpdated": "2024-01-01T00:00:00.000Z"}
            ]
        }),
    );

    let report = run(temp.path());

    let registry = read_registry(temp.path());
    let plugins = registry["plugins"].as_array().unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0]["id"], json!("a"));
    assert_eq!(plugins[0]["license"], json!("GPL"));
    assert_eq!(plugins[0]["official"], json!(false));
    assert_eq!(plugins[0]["version"], json!("1.0.0"));
    assert_ne!(plugins[0]["lastUpdated"], json!("2024-01-01T00:00:00.000Z"));

    assert_eq!(report.removed, vec!["z".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].folder, "c");
    assert_eq!(report.discovered, 1);
    assert_eq!(
        report.plugins[0].status,
        PluginStatus::Updated {
            fields: vec!["name", "version"]
        }
    );
}

#[test]
fn second_run_is_identical_apart_from_timestamps() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "clock",
        &json!({"id": "clock", "name": "Clock", "tags": ["widget"]}),
    );
    write_manifest(
        temp.path(),
        "weather",
        &json!({"id": "weather", "author": "Ana", "minNoctaliaVersion": "2.0.0"}),
    );

    let first = run(temp.path());
    let after_first = read_registry(temp.path());
    let second = run(temp.path());
    let after_second = read_registry(temp.path());

    assert_eq!(first.added().count(), 2);
    assert_eq!(second.unchanged().count(), 2);
    assert!(!second.has_changes());
    assert_eq!(
        without_timestamps(after_first),
        without_timestamps(after_second)
    );
}

#[test]
fn sparse_projection_omits_missing_fields() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "bare",
        &json!({"id": "bare", "name": "Bare", "entryPoints": {"main": "Main.qml"}}),
    );

    run(temp.path());

    let registry = read_registry(temp.path());
    let entry = registry["plugins"][0].as_object().unwrap();
    assert!(!entry.contains_key("description"));
    assert!(!entry.contains_key("entryPoints"));
    assert!(!entry.contains_key("_folder"));
    assert!(!entry.contains_key("folder"));
    assert_eq!(entry["name"], json!("Bare"));
}

#[test]
fn plugins_sorted_by_id_not_folder() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "1-zeta", &json!({"id": "zeta"}));
    write_manifest(temp.path(), "2-Beta", &json!({"id": "Beta"}));
    write_manifest(temp.path(), "3-alpha", &json!({"id": "alpha"}));

    run(temp.path());

    let registry = read_registry(temp.path());
    let ids: Vec<_> = registry["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["alpha", "Beta", "zeta"]);
}

#[test]
fn corrupt_registry_is_rebuilt_from_manifests() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "a", &json!({"id": "a"}));
    std::fs::write(temp.path().join("registry.json"), "{{{").unwrap();

    let report = run(temp.path());

    assert_eq!(report.added().count(), 1);
    let registry = read_registry(temp.path());
    assert_eq!(registry["version"], json!(1));
    assert_eq!(registry["plugins"][0]["license"], json!("MIT"));
}

#[test]
fn strict_mode_leaves_corrupt_registry_untouched() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "a", &json!({"id": "a"}));
    std::fs::write(temp.path().join("registry.json"), "{{{").unwrap();

    let config = SyncConfig::new(temp.path()).with_strict_registry(true);
    let result = SyncCommand::new(config).run(&SyncOptions::new());

    assert!(result.is_err());
    let content = std::fs::read_to_string(temp.path().join("registry.json")).unwrap();
    assert_eq!(content, "{{{");
}

#[test]
fn dry_run_does_not_write() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "a", &json!({"id": "a"}));

    let report = SyncCommand::new(SyncConfig::new(temp.path()))
        .run(&SyncOptions::new().with_dry_run(true))
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.total, 1);
    assert!(!temp.path().join("registry.json").exists());
}

#[test]
fn settings_file_redirects_registry() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "a", &json!({"id": "a"}));
    std::fs::write(
        temp.path().join("plugsync.toml"),
        "registry = \"catalog.json\"\n",
    )
    .unwrap();

    let config = SyncConfig::load(temp.path()).unwrap();
    SyncCommand::new(config).run(&SyncOptions::new()).unwrap();

    assert!(temp.path().join("catalog.json").exists());
    assert!(!temp.path().join("registry.json").exists());
}

#[test]
fn missing_root_aborts_without_writing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("missing");
    let config = SyncConfig::new(&root).with_registry_path(temp.path().join("registry.json"));

    let result = SyncCommand::new(config).run(&SyncOptions::new());

    assert!(result.is_err());
    assert!(!temp.path().join("registry.json").exists());
}

#[test]
fn prior_entries_with_missing_or_null_fields_keep_curation() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "a", &json!({"id": "a", "version": "1.0.0"}));
    write_manifest(temp.path(), "b", &json!({"id": "b", "version": "1.0.0"}));
    write_manifest(temp.path(), "c", &json!({"id": "c"}));
    write_registry(
        temp.path(),
        &json!({
            "version": 1,
            "plugins": [
                {"id": "a", "official": true, "license": "GPL"},
                {"id": "b", "official": true, "license": "Apache-2.0", "lastUpdated": "2024-01-01T00:00:00.000Z"},
                {"id": "c", "official": null, "license": null, "lastUpdated": "not a date"}
            ]
        }),
    );

    let report = run(temp.path());

    assert!(report.added().next().is_none());
    let registry = read_registry(temp.path());
    let plugins = registry["plugins"].as_array().unwrap();
    assert_eq!(plugins.len(), 3);
    assert_eq!(plugins[0]["official"], json!(true));
    assert_eq!(plugins[0]["license"], json!("GPL"));
    assert_eq!(plugins[1]["official"], json!(true));
    assert_eq!(plugins[1]["license"], json!("Apache-2.0"));
    assert_eq!(plugins[2]["official"], json!(false));
    assert_eq!(plugins[2]["license"], json!("MIT"));
    for plugin in plugins {
        assert!(plugin["lastUpdated"].as_str().unwrap().ends_with('Z'));
    }
}

#[test]
fn manifest_with_non_string_fields_is_kept_verbatim() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "a",
        &json!({"id": "a", "author": {"name": "Ana"}, "version": 1, "tags": "widget"}),
    );
    write_registry(
        temp.path(),
        &json!({
            "version": 1,
            "plugins": [
                {"id": "a", "official": true, "license": "GPL", "lastUpdated": "2024-01-01T00:00:00.000Z"}
            ]
        }),
    );

    let report = run(temp.path());

    assert!(report.removed.is_empty());
    assert!(report.failures.is_empty());
    let registry = read_registry(temp.path());
    let entry = &registry["plugins"][0];
    assert_eq!(entry["id"], json!("a"));
    assert_eq!(entry["author"], json!({"name": "Ana"}));
    assert_eq!(entry["version"], json!(1));
    assert_eq!(entry["tags"], json!("widget"));
    assert_eq!(entry["official"], json!(true));
    assert_eq!(entry["license"], json!("GPL"));
}
