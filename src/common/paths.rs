//! Configuration, log and project file paths
//!
//! User-level locations come from the directories crate:
//! - Linux: `~/.config/apichain/`
//! - macOS: `~/Library/Application Support/apichain/`
//! - Windows: `%APPDATA%\apichain\`
//!
//! Project-level locations are relative to the project directory unless the
//! configuration gives an absolute path.

use std::io;
use std::path::{Path, PathBuf};

/// Application name used for per-user directories
const APP_NAME: &str = "apichain";

/// Name of the per-project settings file
pub const PROJECT_CONFIG_FILE: &str = "apichain.toml";

/// Pseudo-API name standing for environment variables
pub const ENV_API: &str = "ENV";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the user-level configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Ensure the log directory exists
pub fn ensure_log_dir() -> io::Result<Option<PathBuf>> {
    if let Some(dir) = log_dir() {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Some(dir))
    } else {
        Ok(None)
    }
}

/// Resolve a configured path against the project directory
pub fn resolve(project_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        project_dir.join(configured)
    }
}

/// File name of a scenario's interaction graph
pub fn interactions_file_name(scenario: &str) -> String {
    format!("{}_interactions.json", scenario)
}

/// Create the parent directory of a file if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
