//! Logging setup: warnings on stderr, full debug trace in rotated files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::macros::format_description;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// File name prefix of rotated log files.
const LOG_FILE_PREFIX: &str = "sonar-dadapush";

/// Rotated files older than this are removed on startup.
const LOG_RETENTION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Install the global subscriber.
///
/// The stderr layer reports warnings and errors unless `quiet` is set. With
/// `debug` a daily-rotated file layer in `config.log_path` records everything
/// down to DEBUG (`RUST_LOG` may narrow it further).
pub fn init(config: &Config, debug: bool, quiet: bool) -> Result<()> {
    let stderr_layer = (!quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(LevelFilter::WARN)
    });

    let file_layer = if debug {
        fs::create_dir_all(&config.log_path).with_context(|| {
            format!("Failed to create log directory: {}", config.log_path.display())
        })?;
        remove_expired_logs(&config.log_path, SystemTime::now() - LOG_RETENTION)?;

        let appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_path, LOG_FILE_PREFIX);
        let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
        let timer = OffsetTime::new(
            local_offset,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        );
        Some(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(timer)
                .with_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
                ),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}

/// Delete our log files last modified before `cutoff`.
pub fn remove_expired_logs(log_path: &Path, cutoff: SystemTime) -> Result<usize> {
    if !log_path.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(log_path)? {
        let path = entry?.path();
        let ours = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !ours {
            continue;
        }

        let expired = fs::metadata(&path)
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if expired && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }

    Ok(removed)
}
