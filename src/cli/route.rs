//! CLI route: single route table and run context. Dispatches to the operations
//! API and presentation.

use crate::api::Cartographer;
use crate::config::{CartographerConfig, ConfigLoader};
use crate::error::CartographyError;
use crate::placeholder::NoopPlaceholders;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_changes_json, format_changes_text, format_init_summary, format_update_summary,
};

/// Runtime context for CLI execution: loaded configuration and the operations API.
/// Built from the command root and optional config path using ConfigLoader only.
pub struct RunContext {
    config: CartographerConfig,
    config_path: Option<PathBuf>,
    color: bool,
}

impl RunContext {
    /// Create run context for a root and optional config path.
    pub fn new(root: &Path, config_path: Option<PathBuf>) -> Result<Self, CartographyError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(root)?,
        };
        Ok(Self::with_config(config, config_path))
    }

    pub fn with_config(config: CartographerConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Force colored text output on or off.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, CartographyError> {
        let started = Instant::now();
        debug!(
            command = command.name(),
            config_path = ?self.config_path,
            "Dispatching command"
        );
        let result = self.execute_inner(command);
        info!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, CartographyError> {
        let cartographer = Cartographer::new(self.config.scan.clone());
        match command {
            Commands::Init {
                root,
                include,
                exclude,
                force,
                no_placeholders,
            } => {
                let include = given_or_configured(include, self.config.scan.include.as_ref());
                let exclude = given_or_configured(exclude, self.config.scan.exclude.as_ref());
                let cartographer = if *no_placeholders {
                    cartographer.with_placeholders(Arc::new(NoopPlaceholders))
                } else {
                    cartographer
                };
                let summary = cartographer.init(root, &include, &exclude, *force)?;
                Ok(format_init_summary(&summary, !*no_placeholders))
            }
            Commands::Changes { root, format } => {
                let changes = cartographer.changes(root)?;
                match format {
                    OutputFormat::Text => Ok(format_changes_text(&changes, self.color)),
                    OutputFormat::Json => format_changes_json(&changes),
                }
            }
            Commands::Update { root } => {
                let summary = cartographer.update(root)?;
                Ok(format_update_summary(&summary))
            }
        }
    }
}

/// Patterns given on the command line, else the configured ones.
fn given_or_configured(given: &[String], configured: Option<&Vec<String>>) -> Vec<String> {
    if given.is_empty() {
        configured.cloned().unwrap_or_default()
    } else {
        given.to_vec()
    }
}
