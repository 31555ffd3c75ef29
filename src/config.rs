//! User settings read from `settings.json` in the config directory.

use std::{fs, io::ErrorKind, path::Path};

use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use staffgrid_db::paths;
use staffgrid_ui::{
    PageReset,
    pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZES, is_allowed_page_size},
};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows per page for every table on start.
    pub default_page_size: usize,
    /// Jump back to the first page whenever search or filters change.
    pub reset_page_on_filter: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            reset_page_on_filter: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads the settings file from the platform config directory.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&paths::settings_path()?)
    }

    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces out-of-range values with defaults, logging each one.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if !is_allowed_page_size(self.default_page_size) {
            warn!(
                "default_page_size {} is not one of {PAGE_SIZES:?}, using {DEFAULT_PAGE_SIZE}",
                self.default_page_size
            );
            self.default_page_size = DEFAULT_PAGE_SIZE;
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            warn!("unknown log_level '{}', using info", self.log_level);
            self.log_level = "info".to_string();
        }
        self
    }

    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    #[must_use]
    pub const fn page_reset(&self) -> PageReset {
        if self.reset_page_on_filter {
            PageReset::FirstPage
        } else {
            PageReset::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_reset(), PageReset::Keep);
    }

    #[test]
    fn test_partial_file_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_page_size": 7, "reset_page_on_filter": true }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap().validated();
        assert_eq!(settings.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.page_reset(), PageReset::FirstPage);
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(AppError::Settings(_))));
    }
}
