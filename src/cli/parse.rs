//! CLI parse: clap types for Cartographer. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Cartographer CLI - Hierarchical content-addressed change detection
#[derive(Parser)]
#[command(name = "cartographer")]
#[command(about = "Track which folders of a source tree changed since they were last mapped")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces global and workspace config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the initial snapshot and per-folder placeholders
    Init {
        /// Repository root path
        #[arg(long)]
        root: PathBuf,

        /// Glob pattern for files to include (repeatable)
        #[arg(long = "include", value_name = "PATTERN")]
        include: Vec<String>,

        /// Glob pattern for files to exclude (repeatable)
        #[arg(long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Rebuild and overwrite an existing snapshot
        #[arg(long)]
        force: bool,

        /// Do not create codemap.md placeholders
        #[arg(long)]
        no_placeholders: bool,
    },
    /// Show what changed since the last snapshot
    Changes {
        /// Repository root path
        #[arg(long)]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Recompute hashes and replace the snapshot
    Update {
        /// Repository root path
        #[arg(long)]
        root: PathBuf,
    },
}

impl Commands {
    /// Root the command operates on.
    pub fn root(&self) -> &Path {
        match self {
            Commands::Init { root, .. } => root,
            Commands::Changes { root, .. } => root,
            Commands::Update { root } => root,
        }
    }

    /// Stable command name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Changes { .. } => "changes",
            Commands::Update { .. } => "update",
        }
    }
}

/// Report format for `changes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
