//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "userlist";
const APPLICATION: &str = "userlist";

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/userlist` or `~/.cache/userlist`
/// - macOS: `~/Library/Caches/dev.userlist.userlist`
/// - Windows: `C:\Users\<User>\AppData\Local\userlist\userlist\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Failure to open the log file.
#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("failed to create log directory {}: {source}", dir.display())]
    Directory { dir: PathBuf, source: io::Error },

    #[error("failed to create log file {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },
}

/// Create (or truncate) the log file at `path`, creating its directory first.
pub fn create_log_file(path: &Path) -> Result<File, LogFileError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| LogFileError::Directory {
            dir: dir.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| LogFileError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Rotate logs: rename latest.log to timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, MAX_OLD_LOGS);
}

fn rotate_logs_in(dir: &Path, keep: usize) {
    let latest = dir.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = dir.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(dir, keep);
}

/// Remove old log files, keeping only the most recent `keep`.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
