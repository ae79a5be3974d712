//! Per-run log files under the project work directory

use crate::config::constants::LOG_DIR;
use crate::error::{MixError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// `<root>/.mixr/logs/<folder>_<pid>_<timestamp>.log`
pub fn log_file_path(root: &Path, pid: u32, timestamp: u64) -> PathBuf {
    let folder = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    root.join(LOG_DIR).join(format!("{folder}_{pid}_{timestamp}.log"))
}

/// Open a fresh log file for this process
pub fn create_log_file(root: &Path) -> Result<File> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| MixError::other(e.to_string()))?
        .as_secs();
    let path = log_file_path(root, std::process::id(), timestamp);

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    Ok(OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?)
}
