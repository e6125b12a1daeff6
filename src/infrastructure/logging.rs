//! Logging system configuration and initialization
//!
//! - Console output and an optional daily rolling log file
//! - Plain text or JSON lines
//! - Verbose dependency targets capped unless the level is `trace`
//! - Timestamps in São Paulo time (UTC-03:00)
//!
//! `RUST_LOG` always wins over the configured level.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::{FixedOffset, Utc};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::{self, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use crate::infrastructure::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "odonto-monitor.log";

/// Targets capped when the configured level is not `trace`.
const QUIET_DIRECTIVES: [&str; 7] = [
    "sqlx::query=warn",
    "sqlx::sqlite=warn",
    "reqwest=info",
    "hyper=warn",
    "hyper_util=warn",
    "h2=warn",
    "tower_http=info",
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writer flushing. Hold it for the lifetime of
/// the process; dropping it flushes and stops the background worker.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Timestamps in America/Sao_Paulo standard time (UTC-03:00)
#[derive(Debug, Clone, Copy, Default)]
pub struct SaoPauloTime;

impl FormatTime for SaoPauloTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now();
        match FixedOffset::west_opt(3 * 3600) {
            Some(offset) => write!(w, "{}", now.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S%.3f %:z")),
            None => write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f UTC")),
        }
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level with
/// noisy dependencies capped below `trace`.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = level.to_lowercase();
    let mut filter = EnvFilter::try_new(&level).map_err(|e| anyhow!("Invalid log level '{level}': {e}"))?;
    if level != "trace" {
        for directive in QUIET_DIRECTIVES {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails when neither console nor file output is enabled, or when a global
/// subscriber is already installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<LogGuard> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config.level)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {}: {e}", config.log_dir.display()))?;
        cleanup_old_logs(&config.log_dir, config.max_files)?;

        let (file_writer, guard) = non_blocking(rolling::daily(&config.log_dir, LOG_FILE_NAME));
        file_guard = Some(guard);
        layers.push(file_layer(file_writer, config.json_format));
    }

    if config.console_output {
        layers.push(console_layer(config.json_format));
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    info!(
        level = %config.level,
        json = config.json_format,
        console = config.console_output,
        file = config.file_output,
        "📝 Logging system initialized"
    );
    if config.file_output {
        info!("Log directory: {}", config.log_dir.display());
    }

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

fn file_layer(writer: non_blocking::NonBlocking, json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(SaoPauloTime)
            .with_target(true)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_timer(SaoPauloTime)
            .with_target(false)
            .with_ansi(false)
            .boxed()
    }
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer().json().with_writer(std::io::stdout).with_timer(SaoPauloTime).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_timer(SaoPauloTime)
            .with_target(false)
            .boxed()
    }
}

/// Delete the oldest `odonto-monitor.log*` files so at most `max_files`
/// remain. `max_files == 0` disables pruning. Returns the removed paths.
pub fn cleanup_old_logs(log_dir: &Path, max_files: u32) -> Result<Vec<PathBuf>> {
    if max_files == 0 || !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut log_files = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_ours = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_NAME));
        if !is_ours || !path.is_file() {
            continue;
        }
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            log_files.push((path, modified));
        }
    }

    // Newest first; ties broken by name so daily suffixes order correctly
    log_files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let keep = max_files as usize;
    let mut removed = Vec::new();
    for (path, _) in log_files.into_iter().skip(keep) {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed old log file: {}", path.display());
                removed.push(path);
            }
            Err(e) => warn!("Failed to remove old log file {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn filter_accepts_configured_levels() {
        assert!(build_env_filter("debug").is_ok());
        assert!(build_env_filter("TRACE").is_ok());
    }

    #[test]
    fn cleanup_keeps_newest_files() {
        let dir = tempdir().unwrap();
        for day in ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04"] {
            std::fs::write(dir.path().join(format!("{LOG_FILE_NAME}.{day}")), day).unwrap();
        }
        std::fs::write(dir.path().join("unrelated.txt"), "keep me").unwrap();

        let removed = cleanup_old_logs(dir.path(), 2).unwrap();
        assert_eq!(removed.len(), 2);

        let mut remaining: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.contains(&"unrelated.txt".to_string()));
    }

    #[test]
    fn cleanup_zero_keeps_everything() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(LOG_FILE_NAME), "x").unwrap();
        assert!(cleanup_old_logs(dir.path(), 0).unwrap().is_empty());
        assert!(cleanup_old_logs(&dir.path().join("missing"), 3).unwrap().is_empty());
    }

    #[test]
    fn sao_paulo_timestamp_has_offset() {
        let mut out = String::new();
        let mut writer = fmt::format::Writer::new(&mut out);
        SaoPauloTime.format_time(&mut writer).unwrap();
        assert!(out.ends_with("-03:00"), "unexpected timestamp: {out}");
    }
}
