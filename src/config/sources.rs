//! Configuration sources layered by [`ConfigLoader`](super::ConfigLoader).

use config::Environment;

pub mod global_file;
pub mod project_file;

/// Environment overrides: `BUNDLE_SYNC__LAYOUT__INSTALL_DIR=.tool`, lists comma-separated.
pub fn environment() -> Environment {
    Environment::with_prefix("BUNDLE_SYNC")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("policy.exclude")
        .with_list_parse_key("policy.preserve")
        .with_list_parse_key("layout.data_dirs")
        .try_parsing(true)
}
