//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come
//! from configuration, environment variables, or CLI flags. Reports go to
//! stdout, so logs default to stderr.

use crate::error::CartographyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full `EnvFilter` directive string.
pub const LOG_ENV: &str = "CARTOGRAPHER_LOG";

/// Environment variable overriding the log format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "CARTOGRAPHER_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Master switch; `--quiet` turns this off
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text
    pub format: String,

    /// Output destination: stderr, stdout, file
    pub output: String,

    /// Log file path (when output is "file")
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    pub color: bool,

    /// Module-specific log levels
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Install the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. `CARTOGRAPHER_LOG` / `CARTOGRAPHER_LOG_FORMAT`
/// 2. The given configuration (already merged with CLI flags)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), CartographyError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let (writer, terminal) = build_writer(config)?;
    let base = Registry::default().with(filter);

    let result = if format == "json" {
        base.with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(writer),
        )
        .try_init()
    } else {
        base.with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(config.color && terminal)
                .with_writer(writer),
        )
        .try_init()
    };

    result.map_err(|e| CartographyError::Config(format!("Failed to install logger: {}", e)))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, CartographyError> {
    if !config.enabled {
        return Ok(EnvFilter::new("off"));
    }
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(directive.parse().map_err(|e| {
            CartographyError::Config(format!("Invalid log directive {:?}: {}", directive, e))
        })?);
    }
    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<String, CartographyError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(CartographyError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Writer for the configured destination, and whether it is a terminal stream.
fn build_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, bool), CartographyError> {
    match config.output.as_str() {
        "stderr" => Ok((BoxMakeWriter::new(std::io::stderr), true)),
        "stdout" => Ok((BoxMakeWriter::new(std::io::stdout), true)),
        "file" => {
            let log_file = config.file.clone().ok_or_else(|| {
                CartographyError::Config("Log output 'file' needs a log file path".to_string())
            })?;
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CartographyError::Config(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .map_err(|e| {
                    CartographyError::Config(format!(
                        "Failed to open log file {:?}: {}",
                        log_file, e
                    ))
                })?;
            Ok((BoxMakeWriter::new(Mutex::new(file)), false))
        }
        other => Err(CartographyError::Config(format!(
            "Invalid log output: {} (must be 'stderr', 'stdout', or 'file')",
            other
        ))),
    }
}
