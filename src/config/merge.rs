//! Merge rules: defaults applied beneath every other source.

use super::LayoutConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with layout and logging defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let layout = LayoutConfig::default();
    Config::builder()
        .set_default("layout.install_dir", layout.install_dir)?
        .set_default("layout.source_dir", layout.source_dir)?
        .set_default("layout.version_file", layout.version_file)?
        .set_default("layout.metadata_file", layout.metadata_file)?
        .set_default("layout.hash_len", layout.hash_len as i64)?
        .set_default("logging.level", "info")
}
