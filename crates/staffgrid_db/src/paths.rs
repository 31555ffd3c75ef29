//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::{fs, path::PathBuf};

use directories::ProjectDirs;

use crate::StoreError;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "robertazzopardi";
const APPLICATION: &str = "staffgrid";

fn project_dirs() -> Result<ProjectDirs, StoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or(StoreError::NoHomeDirectory)
}

/// Directory for persistent application data.
///
/// # Errors
///
/// Fails when no home directory can be determined.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Directory for configuration files.
///
/// # Errors
///
/// Fails when no home directory can be determined.
pub fn config_dir() -> Result<PathBuf, StoreError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Directory for logs and other regenerable data.
///
/// # Errors
///
/// Fails when no home directory can be determined.
pub fn cache_dir() -> Result<PathBuf, StoreError> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

/// Path of the sqlite database, creating its parent directory.
///
/// # Errors
///
/// Fails when no home directory can be determined or the directory cannot
/// be created.
pub fn get_db_path() -> Result<PathBuf, StoreError> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir)?;
    Ok(dir.join("staffgrid.db"))
}

/// Path of the settings file. The file itself may not exist.
///
/// # Errors
///
/// Fails when no home directory can be determined.
pub fn settings_path() -> Result<PathBuf, StoreError> {
    Ok(config_dir()?.join("settings.json"))
}

/// Path of the current log file, creating its parent directory.
///
/// # Errors
///
/// Fails when no home directory can be determined or the directory cannot
/// be created.
pub fn log_file() -> Result<PathBuf, StoreError> {
    let dir = cache_dir()?;
    fs::create_dir_all(&dir)?;
    Ok(dir.join("latest.log"))
}

/// Moves the previous `latest.log` aside as `previous.log`.
pub fn rotate_logs() {
    let Ok(dir) = cache_dir() else { return };
    let latest = dir.join("latest.log");
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join("previous.log"));
    }
}
