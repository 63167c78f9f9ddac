//! Version checks against installed instances

use super::test_utils::{make_bundle, read, write_file};
use bundle_sync::metadata::MetadataStore;
use bundle_sync::tree::hasher::fingerprint_tree;
use bundle_sync::{Installer, MetadataRead, Policy, VersionMetadata};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sidecar(instance: &Path) -> MetadataStore {
    MetadataStore::new(instance, ".version.json")
}

/// Replace the sidecar with one recording `version` and `hash`
fn record(instance: &Path, version: &str, hash: &str) {
    let metadata = VersionMetadata::new(version, hash, "/elsewhere", Utc::now());
    sidecar(instance).write(&metadata).unwrap();
}

#[test]
fn test_uninitialized_project() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();

    let result = Installer::default().check_version(project.path(), bundle.path());

    assert!(!result.is_initialized);
    assert!(!result.update_available);
    assert_eq!(result.current_version, None);
    assert_eq!(result.source_version, None);
}

#[test]
fn test_fresh_install_has_no_update() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    let result = installer.check_version(project.path(), bundle.path());

    assert!(result.is_initialized);
    assert_eq!(result.current_version.as_deref(), Some("1.0.0"));
    assert_eq!(result.source_version.as_deref(), Some("1.0.0"));
    assert!(!result.update_available);
    assert_eq!(result.source_path.as_deref(), Some(bundle.path()));
}

#[test]
fn test_new_bundle_release_is_detected() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    write_file(bundle.path(), "VERSION", "1.1.0\n");
    write_file(bundle.path(), "prompts/planner.md", "You plan.\n");

    let result = installer.check_version(project.path(), bundle.path());
    assert!(result.update_available);
    assert_eq!(result.current_version.as_deref(), Some("1.0.0"));
    assert_eq!(result.source_version.as_deref(), Some("1.1.0"));

    assert!(installer.update(project.path(), bundle.path()).success);
    assert!(!installer.check_version(project.path(), bundle.path()).update_available);
}

#[test]
fn test_update_requires_content_and_version_change() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    let instance = project.path().join(".auto-claude");
    let live_hash = fingerprint_tree(bundle.path(), &Policy::default(), 16).unwrap();

    // Same content, different recorded version
    record(&instance, "0.9.0", &live_hash);
    assert!(!installer.check_version(project.path(), bundle.path()).update_available);

    // Different content, same version
    record(&instance, "1.0.0", "0000000000000000");
    assert!(!installer.check_version(project.path(), bundle.path()).update_available);

    // Both moved
    record(&instance, "0.9.0", "0000000000000000");
    let result = installer.check_version(project.path(), bundle.path());
    assert!(result.update_available);
    assert_eq!(result.current_version.as_deref(), Some("0.9.0"));
}

#[test]
fn test_legacy_instance_synthesized_once() {
    let bundle = make_bundle("1.2.0");
    let project = TempDir::new().unwrap();
    let instance = project.path().join(".auto-claude");
    write_file(&instance, "README.md", "# Tool\n");
    write_file(&instance, "prompts/coder.md", "old prompt\n");
    let installer = Installer::default();

    let first = installer.check_version(project.path(), bundle.path());
    assert!(first.is_initialized);
    assert_eq!(first.current_version.as_deref(), Some("1.2.0"));
    assert!(!first.update_available);

    let MetadataRead::Present(synthesized) = sidecar(&instance).read() else {
        panic!("sidecar was not persisted");
    };
    assert_eq!(synthesized.version, "1.2.0");
    assert_eq!(
        synthesized.source_hash,
        fingerprint_tree(&instance, &Policy::default(), 16).unwrap()
    );

    let persisted = read(&instance.join(".version.json"));
    let second = installer.check_version(project.path(), bundle.path());
    assert_eq!(second.current_version, first.current_version);
    assert_eq!(read(&instance.join(".version.json")), persisted);
}

#[test]
fn test_malformed_sidecar_treated_as_absent() {
    let bundle = make_bundle("3.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    let instance = project.path().join(".auto-claude");
    fs::write(instance.join(".version.json"), "{ not json").unwrap();

    let result = installer.check_version(project.path(), bundle.path());

    assert!(result.is_initialized);
    assert_eq!(result.current_version.as_deref(), Some("3.0.0"));
    assert!(matches!(sidecar(&instance).read(), MetadataRead::Present(_)));
}

#[test]
fn test_missing_source_reports_installed_version() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    let gone = project.path().join("moved-away");
    let result = installer.check_version(project.path(), &gone);

    assert!(result.is_initialized);
    assert_eq!(result.current_version.as_deref(), Some("1.0.0"));
    assert_eq!(result.source_version, None);
    assert!(!result.update_available);
}

#[test]
fn test_check_does_not_modify_tracked_instance() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();
    assert!(installer.initialize(project.path(), bundle.path()).success);

    let sidecar_path = project.path().join(".auto-claude/.version.json");
    let before = read(&sidecar_path);
    write_file(bundle.path(), "VERSION", "2.0.0\n");
    installer.check_version(project.path(), bundle.path());

    assert_eq!(read(&sidecar_path), before);
}
