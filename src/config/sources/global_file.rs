//! Global config file source: $XDG_CONFIG_HOME/cartographer/config.toml or ~/.config/cartographer/config.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::PathBuf;
use tracing::debug;

/// Path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join("cartographer").join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(mut builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    if let Some(path) = global_config_path() {
        if path.is_file() {
            debug!(config_path = %path.display(), "Using global configuration");
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    builder
}
