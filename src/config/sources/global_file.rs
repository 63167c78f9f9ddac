//! Global config file source: `$XDG_CONFIG_HOME/bundle-sync/config.toml`,
//! falling back to `~/.config/bundle-sync/config.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("bundle-sync").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match global_config_path() {
        Some(path) if path.is_file() => {
            let path = dunce::canonicalize(&path).unwrap_or(path);
            Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "no global configuration file");
            Ok(builder)
        }
        None => Ok(builder),
    }
}
