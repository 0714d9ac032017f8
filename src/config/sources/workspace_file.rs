//! Workspace config file source: <root>/.slim/config.toml

use crate::store::STATE_DIR;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to a root's workspace config file.
pub fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("config.toml")
}

/// Add the workspace config file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    root: &Path,
) -> ConfigBuilder<DefaultState> {
    let path = workspace_config_path(root);
    if path.is_file() {
        debug!(config_path = %path.display(), "Using workspace configuration");
        builder = builder.add_source(File::from(path).required(false));
    }
    builder
}
