//! Configuration System
//!
//! Layered configuration built with the `config` crate. Lowest to highest
//! precedence: built-in defaults, the global config file, the workspace config
//! file under the root's state directory, then `CARTOGRAPHER__*` environment
//! variables. An explicit config file replaces both file layers.

use crate::error::CartographyError;
use crate::logging::LoggingConfig;
use crate::tree::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Prefix for environment overrides, e.g. `CARTOGRAPHER__SCAN__THREADS=4`.
pub const ENV_PREFIX: &str = "CARTOGRAPHER";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartographerConfig {
    /// Pattern resolution and hashing settings
    pub scan: ScanConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Pattern resolution and hashing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Include patterns; when unset, the snapshot's recorded patterns apply
    pub include: Option<Vec<String>>,

    /// Exclude patterns; when unset, the snapshot's recorded patterns apply
    pub exclude: Option<Vec<String>>,

    /// Honour the root `.gitignore`
    pub respect_gitignore: bool,

    /// Skip hidden entries below the root
    pub skip_hidden: bool,

    /// Hashing workers (0 = one per core)
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            respect_gitignore: true,
            skip_hidden: true,
            threads: 0,
        }
    }
}

impl ScanConfig {
    /// Resolver configuration for the given patterns, with this config's
    /// ignore settings.
    pub fn resolver_config(&self, include: Vec<String>, exclude: Vec<String>) -> ResolverConfig {
        ResolverConfig {
            include,
            exclude,
            respect_gitignore: self.respect_gitignore,
            skip_hidden: self.skip_hidden,
        }
    }

    /// Current pattern set: configured patterns where present, otherwise the
    /// recorded ones.
    pub fn effective_patterns(
        &self,
        recorded_include: &[String],
        recorded_exclude: &[String],
    ) -> (Vec<String>, Vec<String>) {
        let include = self
            .include
            .clone()
            .unwrap_or_else(|| recorded_include.to_vec());
        let exclude = self
            .exclude
            .clone()
            .unwrap_or_else(|| recorded_exclude.to_vec());
        (include, exclude)
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a root: defaults, global file, workspace file, env.
    pub fn load(root: &Path) -> Result<CartographerConfig, CartographyError> {
        let builder = config::Config::builder();
        let builder = sources::global_file::add_to_builder(builder);
        let builder = sources::workspace_file::add_to_builder(builder, root);
        Self::finish(builder)
    }

    /// Load configuration from one explicit file plus env overrides.
    pub fn load_from_file(path: &Path) -> Result<CartographerConfig, CartographyError> {
        if !path.is_file() {
            return Err(CartographyError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder =
            config::Config::builder().add_source(config::File::from(path).required(true));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<CartographerConfig, CartographyError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scan.include")
                    .with_list_parse_key("scan.exclude"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
