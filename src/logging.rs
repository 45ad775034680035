//! Logging configuration and initialization for repodex.
//!
//! Provides optional file-based logging with rotation plus stderr output.

use crate::config::{Config, LoggingConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Guard that must be held for the lifetime of the application.
/// When dropped, flushes any pending log writes.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _stderr_guard: Option<WorkerGuard>,
}

/// Initialize the logging subsystem based on configuration.
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let mut file_guard = None;
    let mut stderr_guard = None;

    let file_filter = parse_level(&config.level);

    let registry = tracing_subscriber::registry();

    if config.enabled && config.stderr {
        // Both file and stderr logging
        let log_dir = resolve_log_dir(&config.directory)?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let rotation = parse_rotation(&config.rotation);
        let file_appender = RollingFileAppender::new(rotation, &log_dir, &config.file_prefix);
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(file_filter);

        let stderr_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("repodex=info"));
        let (non_blocking_stderr, guard) = tracing_appender::non_blocking(std::io::stderr());
        stderr_guard = Some(guard);

        let stderr_layer = fmt::layer()
            .with_writer(non_blocking_stderr)
            .with_target(false)
            .with_filter(stderr_filter);

        registry
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .context("Failed to initialize logging subscriber")?;
    } else if config.enabled {
        // File logging only
        let log_dir = resolve_log_dir(&config.directory)?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let rotation = parse_rotation(&config.rotation);
        let file_appender = RollingFileAppender::new(rotation, &log_dir, &config.file_prefix);
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(file_filter);

        registry
            .with(file_layer)
            .try_init()
            .context("Failed to initialize logging subscriber")?;
    } else if config.stderr {
        // Stderr logging only
        let stderr_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("repodex=info"));
        let (non_blocking_stderr, guard) = tracing_appender::non_blocking(std::io::stderr());
        stderr_guard = Some(guard);

        let stderr_layer = fmt::layer()
            .with_writer(non_blocking_stderr)
            .with_target(false)
            .with_filter(stderr_filter);

        registry
            .with(stderr_layer)
            .try_init()
            .context("Failed to initialize logging subscriber")?;
    } else {
        // No logging - just init empty registry
        registry
            .try_init()
            .context("Failed to initialize logging subscriber")?;
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

/// Relative log directories land under the platform data dir; this tool
/// has no project root to anchor them to.
fn resolve_log_dir(directory: &Path) -> Result<PathBuf> {
    if directory.is_absolute() {
        Ok(directory.to_path_buf())
    } else {
        Ok(Config::data_dir()?.join(directory))
    }
}

fn parse_level(level: &str) -> EnvFilter {
    let level_lower = level.to_lowercase();
    let level_str = match level_lower.as_str() {
        "trace" => "repodex=trace",
        "debug" => "repodex=debug",
        "info" => "repodex=info",
        "warn" => "repodex=warn",
        "error" => "repodex=error",
        _ => {
            eprintln!(
                "Warning: Unknown log level '{}', defaulting to 'info'",
                level
            );
            "repodex=info"
        }
    };
    EnvFilter::new(level_str)
}

fn parse_rotation(rotation: &str) -> Rotation {
    let rotation_lower = rotation.to_lowercase();
    match rotation_lower.as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
