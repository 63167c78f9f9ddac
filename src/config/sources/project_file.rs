//! Project config file source: <project>/.bundle-sync.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// File name looked up at the project root
pub const PROJECT_CONFIG_FILE: &str = ".bundle-sync.toml";

/// Add the project config file to builder if present.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = project_root.join(PROJECT_CONFIG_FILE);
    if path.is_file() {
        return Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)));
    }
    Ok(builder)
}
