//! Log setup.
//!
//! The terminal belongs to the UI, so all `tracing` output goes to a file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Environment variable that overrides `logging.level`.
pub const LOG_ENV: &str = "CADENZA_LOG";

/// Install the global subscriber. The returned guard flushes pending lines on
/// drop and must live until shutdown.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<WorkerGuard> {
    let path = settings
        .file
        .clone()
        .or_else(default_log_path)
        .unwrap_or_else(|| PathBuf::from("cadenza.log"));

    let (dir, file_name) = split_log_path(&path);
    fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("cadenza.log")
        .to_string();
    (dir, file_name)
}
