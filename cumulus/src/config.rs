//! Application configuration.
//!
//! Loaded from a TOML file. A missing file means defaults.

use crate::error::{ConfigParseSnafu, ConfigReadSnafu, Error, Result};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings for an [`Application`](crate::Application).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path opened at startup. Empty means the root route.
    pub initial_path: String,
    /// Terminal poll interval in milliseconds.
    pub tick_rate_ms: u64,
    /// Capture mouse events.
    pub mouse_capture: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_path: String::new(),
            tick_rate_ms: 100,
            mouse_capture: true,
        }
    }
}

impl AppConfig {
    /// Returns the default config location, `<config_dir>/cumulus/config.toml`.
    ///
    /// Falls back to the current directory if the platform has no config dir.
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cumulus").join("config.toml")
    }

    /// Load from `path`, or from [`AppConfig::default_path`] when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).context(ConfigReadSnafu { path: path.clone() })?;
        let config = Self::from_toml(&content).context(ConfigParseSnafu { path: path.clone() })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Checks:
    /// - `tick_rate_ms` is within `1..=10_000`
    /// - `initial_path` is empty or starts with `/`
    pub fn validate(&self) -> Result<()> {
        if !(1..=10_000).contains(&self.tick_rate_ms) {
            return Err(Error::ConfigInvalid {
                message: format!("tick_rate_ms must be between 1 and 10000, got {}", self.tick_rate_ms),
            });
        }
        if !self.initial_path.is_empty() && !self.initial_path.starts_with('/') {
            return Err(Error::ConfigInvalid {
                message: format!("initial_path must be empty or start with '/', got '{}'", self.initial_path),
            });
        }
        Ok(())
    }

    /// Poll interval as a `Duration`.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_path = \"/detail\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.initial_path, "/detail");
        assert_eq!(config.tick_rate_ms, 100);
        assert!(config.mouse_capture);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_path = \"/cloudEdit\"\ntick_rate_ms = 250\nmouse_capture = false").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config,
            AppConfig { initial_path: "/cloudEdit".into(), tick_rate_ms: 250, mouse_capture: false }
        );
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_ms = \"fast\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "got {err:?}");
    }

    #[test]
    fn test_validation() {
        let zero_tick = AppConfig { tick_rate_ms: 0, ..AppConfig::default() };
        assert!(matches!(zero_tick.validate(), Err(Error::ConfigInvalid { .. })));

        let relative = AppConfig { initial_path: "detail".into(), ..AppConfig::default() };
        assert!(matches!(relative.validate(), Err(Error::ConfigInvalid { .. })));

        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_ms = 0").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }
}
