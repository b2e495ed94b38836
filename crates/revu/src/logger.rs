//! File-based logging using simplelog
//!
//! The terminal belongs to the UI, so log records go to a file:
//! `--log-file` when given, otherwise `~/.cache/revu/revu.log` on Linux.
//! The level comes from `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "revu.log";

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("revu").join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}

/// Map a `RUST_LOG` value to a level filter
pub fn parse_level(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize file-based logging.
///
/// Returns the path of the log file.
pub fn init(path: Option<PathBuf>) -> Result<PathBuf> {
    let log_file = path.unwrap_or_else(default_log_path);
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let level = std::env::var("RUST_LOG")
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c)
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}
