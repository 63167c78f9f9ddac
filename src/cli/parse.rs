//! CLI parse: clap types. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Install and update a template bundle inside a project
#[derive(Parser, Debug)]
#[command(name = "bundle-sync")]
#[command(about = "Install and update a template bundle inside projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether the project is initialized and whether an update exists
    Check {
        /// Source bundle directory
        #[arg(long)]
        source: PathBuf,
    },
    /// Install the bundle into the project
    Init {
        /// Source bundle directory
        #[arg(long)]
        source: PathBuf,
    },
    /// Update the installed bundle, keeping project data
    Update {
        /// Source bundle directory
        #[arg(long)]
        source: PathBuf,
    },
    /// Print the installed instance path, if any
    Path,
    /// Print the fingerprint used for update detection
    Hash {
        /// Directory to fingerprint
        dir: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}
