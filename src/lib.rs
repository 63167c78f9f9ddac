//! Bundle Sync: per-project installation of a template bundle
//!
//! Installs a copy of a source bundle into a conventional directory inside a
//! project, detects when the bundle has moved on, and updates the copy
//! without deleting or overwriting project-owned state.

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod metadata;
pub mod policy;
pub mod resolver;
pub mod tree;

pub use config::{BundleConfig, LayoutConfig};
pub use error::{InstallError, MetadataError, SyncError};
pub use lifecycle::{InitializationResult, Installer};
pub use metadata::{MetadataRead, VersionMetadata};
pub use policy::{Policy, PolicyConfig};
pub use resolver::VersionCheckResult;
pub use tree::sync::SyncMode;
