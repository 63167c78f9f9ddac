//! Config loading facade: assembles the layered sources into a [`BundleConfig`].

use super::{merge, sources, BundleConfig};
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

/// Entry point for loading configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project.
    ///
    /// Precedence: defaults < global config file < project config file < environment.
    pub fn load(project_root: &Path) -> Result<BundleConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::project_file::add_to_builder(builder, project_root)?;
        let builder = builder.add_source(sources::environment());

        let config: BundleConfig = builder.build()?.try_deserialize()?;
        debug!(project = %project_root.display(), "configuration loaded");
        Ok(config)
    }

    /// Load defaults plus a single explicit TOML file.
    pub fn load_from_file(path: &Path) -> Result<BundleConfig, ConfigError> {
        let config = merge::builder_with_defaults()?
            .add_source(File::from(path).format(config::FileFormat::Toml).required(true))
            .build()?;
        config.try_deserialize()
    }
}
