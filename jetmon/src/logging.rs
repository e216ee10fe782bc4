//! File logging. The dashboard owns the terminal, so tracing output goes to
//! `$XDG_CACHE_HOME/jetmon/jetmon.log` and only when `JETMON_LOG` is set
//! (its value is used as the filter, e.g. `JETMON_LOG=debug`).

use std::{fs, path::PathBuf, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub fn log_path() -> PathBuf {
    let dir = match std::env::var_os("XDG_CACHE_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => dirs_next::cache_dir().unwrap_or_else(|| PathBuf::from(".")),
    };
    dir.join("jetmon").join("jetmon.log")
}

/// Returns the log file path when logging was enabled.
pub fn init() -> anyhow::Result<Option<PathBuf>> {
    let Ok(filter) = std::env::var("JETMON_LOG") else {
        return Ok(None);
    };
    let filter = if filter.trim().is_empty() || filter == "1" {
        "info".to_string()
    } else {
        filter
    };
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(Some(path))
}
