//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_check_result, format_fingerprint, format_initialization, format_install_path,
};
use crate::config::{BundleConfig, ConfigLoader};
use crate::error::InstallError;
use crate::lifecycle::{InitializationResult, Installer, SyncOutcome};
use crate::tree::hasher::fingerprint_tree;
use std::path::PathBuf;
use tracing::info;

/// Rendered command output and whether the operation succeeded
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: project root, effective config and installer.
pub struct RunContext {
    installer: Installer,
    config: BundleConfig,
    project: PathBuf,
    format: String,
}

impl RunContext {
    /// Create run context from the project root and optional config path. Uses ConfigLoader only.
    pub fn new(
        project: PathBuf,
        config_path: Option<PathBuf>,
        format: String,
    ) -> Result<Self, InstallError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&project)?,
        };
        Self::from_config(project, config, format)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(
        project: PathBuf,
        config: BundleConfig,
        format: String,
    ) -> Result<Self, InstallError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            InstallError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        if format != "text" && format != "json" {
            return Err(InstallError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                format
            )));
        }

        Ok(Self {
            installer: Installer::new(&config),
            config,
            project,
            format,
        })
    }

    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, InstallError> {
        match command {
            Commands::Check { source } => {
                let result = self.installer.check_version(&self.project, source);
                Ok(CommandOutput::ok(format_check_result(&result, &self.format)))
            }
            Commands::Init { source } => {
                let outcome = self.installer.try_initialize(&self.project, source);
                Ok(self.render_sync(outcome, false))
            }
            Commands::Update { source } => {
                let outcome = self.installer.try_update(&self.project, source);
                Ok(self.render_sync(outcome, true))
            }
            Commands::Path => {
                let path = self.installer.install_path(&self.project);
                Ok(CommandOutput::ok(format_install_path(
                    path.as_deref(),
                    &self.format,
                )))
            }
            Commands::Hash { dir } => {
                let fingerprint = fingerprint_tree(
                    dir,
                    self.installer.policy(),
                    self.installer.layout().hash_len,
                )?;
                Ok(CommandOutput::ok(format_fingerprint(
                    dir,
                    &fingerprint,
                    &self.format,
                )))
            }
            Commands::Config => {
                let text = toml::to_string_pretty(&self.config).map_err(|e| {
                    InstallError::ConfigError(format!("Failed to render configuration: {}", e))
                })?;
                Ok(CommandOutput::ok(text))
            }
        }
    }

    fn render_sync(
        &self,
        outcome: Result<SyncOutcome, InstallError>,
        was_update: bool,
    ) -> CommandOutput {
        match outcome {
            Ok(outcome) => {
                info!(project = %self.project.display(), was_update, "sync command succeeded");
                let result = InitializationResult::succeeded(outcome.metadata.version, was_update);
                CommandOutput::ok(format_initialization(
                    &result,
                    Some(&outcome.report),
                    &self.format,
                ))
            }
            Err(e) => {
                let result = InitializationResult::failed(&e);
                CommandOutput {
                    text: format_initialization(&result, None, &self.format),
                    success: false,
                }
            }
        }
    }
}
