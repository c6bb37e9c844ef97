//! User settings loaded from `~/.consolex/settings.yaml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_DEBOUNCE_MS, DEFAULT_ORIGIN, REQUEST_TIMEOUT_SECS, SETTINGS_FILE,
};
use crate::error::Result;

/// Tunables for the console. Every field falls back to its default when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base for endpoints without an `http://`/`https://` scheme
    pub origin: String,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            origin: String::from(DEFAULT_ORIGIN),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from `dir`, using defaults when the file is missing or malformed
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Settings::default(),
        };
        let mut settings = match serde_yaml::from_str::<Settings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed settings file");
                return Settings::default();
            }
        };
        if let Err(e) = settings.origin_url() {
            tracing::warn!(origin = %settings.origin, error = %e, "Ignoring malformed origin");
            settings.origin = String::from(DEFAULT_ORIGIN);
        }
        settings
    }

    pub fn origin_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.origin)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `~/.consolex`, or `./.consolex` when no home directory is known
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "origin: https://staging.example.com\n").unwrap();

        let settings = Settings::load(dir.path());
        assert_eq!(settings.origin, "https://staging.example.com");
        assert_eq!(settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(settings.timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_malformed_origin_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "origin: not a url\ndebounce_ms: 250\n").unwrap();

        let settings = Settings::load(dir.path());
        assert_eq!(settings.origin, DEFAULT_ORIGIN);
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.origin_url().unwrap().as_str(), "http://localhost/");
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "debounce_ms: [not a number").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }
}
