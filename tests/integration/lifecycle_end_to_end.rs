//! Initialize from a bundle into an empty project

use super::test_utils::{list_files, make_bundle, read, write_file};
use bundle_sync::metadata::MetadataStore;
use bundle_sync::{BundleConfig, Installer, MetadataRead, Policy, PolicyConfig};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// README, env from template, scaffolded data dir, and a sidecar matching VERSION
#[test]
fn test_initialize_populates_instance() {
    let bundle = make_bundle("2.3.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();

    let result = installer.initialize(project.path(), bundle.path());
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.version.as_deref(), Some("2.3.0"));
    assert_eq!(result.was_update, Some(false));

    let instance = project.path().join(".auto-claude");
    assert_eq!(read(&instance.join("README.md")), "# Tool\n");
    assert_eq!(read(&instance.join(".env")), "API_KEY=\n");
    assert_eq!(read(&instance.join("prompts/coder.md")), "You write code.\n");

    let specs: Vec<_> = fs::read_dir(instance.join("specs"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(specs, vec![".gitkeep"]);
    assert!(instance.join("roadmap/.gitkeep").exists());
    assert!(instance.join("ideation/.gitkeep").exists());

    let MetadataRead::Present(metadata) = MetadataStore::new(&instance, ".version.json").read()
    else {
        panic!("sidecar missing after initialize");
    };
    assert_eq!(metadata.version, "2.3.0");
    assert_eq!(metadata.initialized_at, metadata.updated_at);
    assert_eq!(metadata.source_hash.len(), 16);
}

/// A second initialize fails and leaves the first instance untouched
#[test]
fn test_initialize_refuses_existing_instance() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Installer::default();

    assert!(installer.initialize(project.path(), bundle.path()).success);
    let instance = project.path().join(".auto-claude");
    write_file(&instance, "README.md", "edited locally");
    let before = list_files(&instance);
    let sidecar_before = read(&instance.join(".version.json"));

    write_file(bundle.path(), "README.md", "newer bundle readme");
    let second = installer.initialize(project.path(), bundle.path());

    assert!(!second.success);
    assert!(second.error.unwrap().contains("Already initialized"));
    assert_eq!(list_files(&instance), before);
    assert_eq!(read(&instance.join("README.md")), "edited locally");
    assert_eq!(read(&instance.join(".version.json")), sidecar_before);
}

/// A bundle without VERSION installs as 0.0.0
#[test]
fn test_initialize_without_version_marker() {
    let bundle = make_bundle("ignored");
    fs::remove_file(bundle.path().join("VERSION")).unwrap();
    let project = TempDir::new().unwrap();

    let result = Installer::default().initialize(project.path(), bundle.path());

    assert!(result.success);
    assert_eq!(result.version.as_deref(), Some("0.0.0"));
}

/// An env file shipped by the bundle wins over the template
#[test]
fn test_existing_env_not_overwritten_by_template() {
    let bundle = make_bundle("1.0.0");
    write_file(bundle.path(), ".env", "SHIPPED=1\n");
    let project = TempDir::new().unwrap();

    let mut config = BundleConfig::default();
    config.policy.exclude.retain(|name| name != ".env");
    let installer = Installer::new(&config);

    assert!(installer.initialize(project.path(), bundle.path()).success);
    assert_eq!(
        read(&project.path().join(".auto-claude/.env")),
        "SHIPPED=1\n"
    );
}

/// Data directories shipped by the bundle are kept as copied, without a marker
#[test]
fn test_shipped_data_dir_left_as_is() {
    let bundle = make_bundle("1.0.0");
    write_file(bundle.path(), "roadmap/plan.md", "plan");
    let project = TempDir::new().unwrap();

    let installer = Installer::with_parts(
        BundleConfig::default().layout,
        Policy::new(&PolicyConfig {
            exclude: vec!["__pycache__".to_string()],
            preserve: Vec::new(),
        }),
    );

    assert!(installer.initialize(project.path(), bundle.path()).success);
    let roadmap = project.path().join(".auto-claude/roadmap");
    assert_eq!(read(&roadmap.join("plan.md")), "plan");
    assert!(!roadmap.join(".gitkeep").exists());
}

/// The visible source directory is never reported as the install
#[test]
fn test_source_dir_is_not_an_install() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join("auto-claude")).unwrap();
    let installer = Installer::default();

    assert_eq!(installer.install_path(project.path()), None);
    assert!(!installer.check_version(project.path(), bundle.path()).is_initialized);

    assert!(installer.initialize(project.path(), bundle.path()).success);
    assert_eq!(
        installer.install_path(project.path()),
        Some(project.path().join(".auto-claude"))
    );
}

/// Concurrent initializers on one project: exactly one wins
#[test]
fn test_concurrent_initialize_single_winner() {
    let bundle = make_bundle("1.0.0");
    let project = TempDir::new().unwrap();
    let installer = Arc::new(Installer::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let installer = Arc::clone(&installer);
            let project = project.path().to_path_buf();
            let bundle = bundle.path().to_path_buf();
            thread::spawn(move || installer.initialize(&project, &bundle).success)
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}

/// A bundle file that is a symlink to a regular file is installed and hashed
#[cfg(unix)]
#[test]
fn test_file_symlink_in_bundle_is_installed() {
    let bundle = make_bundle("1.0.0");
    std::os::unix::fs::symlink(
        bundle.path().join("README.md"),
        bundle.path().join("GUIDE.md"),
    )
    .unwrap();
    let project = TempDir::new().unwrap();
    let installer = Installer::default();

    let with_link =
        bundle_sync::tree::hasher::fingerprint_tree(bundle.path(), &Policy::default(), 16)
            .unwrap();
    let result = installer.initialize(project.path(), bundle.path());

    assert!(result.success, "{:?}", result.error);
    let guide = project.path().join(".auto-claude/GUIDE.md");
    assert!(!guide.is_symlink());
    assert_eq!(read(&guide), "# Tool\n");

    fs::remove_file(bundle.path().join("GUIDE.md")).unwrap();
    let without_link =
        bundle_sync::tree::hasher::fingerprint_tree(bundle.path(), &Policy::default(), 16)
            .unwrap();
    assert_ne!(with_link, without_link);
}
