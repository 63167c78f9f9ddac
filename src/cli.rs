//! CLI domain: parse, route, presentation and output only.
//! The route table dispatches to the [`Installer`](crate::lifecycle::Installer).

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_check_result, format_fingerprint, format_initialization, format_install_path,
};
pub use route::{CommandOutput, RunContext};
