//! Application configuration
//!
//! Paths and driver budgets for the CLI, loaded from a YAML file. An explicit
//! `--config` path wins; otherwise the platform config directory is probed
//! and a missing file falls back to the defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use actionbook_driver::DriverTimeouts;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned for action definition files.
    pub actions_dir: PathBuf,

    /// Directory run reports are written into.
    pub report_dir: PathBuf,

    /// Directory failure screenshots are written into.
    pub screenshot_dir: PathBuf,

    /// Directory for daily log files; stdout only when unset.
    pub log_dir: Option<PathBuf>,

    /// Driver wait budgets.
    pub timeouts: TimeoutsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            actions_dir: PathBuf::from("./actions"),
            report_dir: PathBuf::from("./reports"),
            screenshot_dir: PathBuf::from("./reports/screenshots"),
            log_dir: None,
            timeouts: TimeoutsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Platform default config path: `<config dir>/actionbook/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("actionbook").join("config.yaml"))
    }
}

/// Wait budgets in milliseconds, mirroring [`DriverTimeouts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub page_ready_ms: u64,
    pub element_visible_ms: u64,
    pub clickable_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        let defaults = DriverTimeouts::default();
        Self {
            page_ready_ms: defaults.page_ready_ms,
            element_visible_ms: defaults.element_visible_ms,
            clickable_ms: defaults.clickable_ms,
        }
    }
}

impl TimeoutsConfig {
    pub fn to_driver_timeouts(&self) -> DriverTimeouts {
        DriverTimeouts {
            page_ready_ms: self.page_ready_ms,
            element_visible_ms: self.element_visible_ms,
            clickable_ms: self.clickable_ms,
        }
    }
}

/// Where the loaded configuration came from. `main` logs this once the
/// subscriber is installed, since config loading happens before logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// The probed file does not exist; defaults in effect.
    MissingFile(PathBuf),
    /// No platform config directory at all; defaults in effect.
    Defaults,
}

/// Loads the application configuration.
pub async fn load_config(path: Option<&Path>) -> Result<(AppConfig, ConfigSource)> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match AppConfig::default_path() {
            Some(path) => path,
            None => return Ok((AppConfig::default(), ConfigSource::Defaults)),
        },
    };

    if path.exists() {
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok((config, ConfigSource::File(path)))
    } else {
        Ok((AppConfig::default(), ConfigSource::MissingFile(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "actions_dir: ./books\ntimeouts:\n  clickable_ms: 2000\n",
        )
        .await
        .unwrap();

        let (config, source) = load_config(Some(&path)).await.unwrap();
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.actions_dir, PathBuf::from("./books"));
        assert_eq!(config.timeouts.clickable_ms, 2000);
        // Unset budgets keep their defaults.
        assert_eq!(config.timeouts.page_ready_ms, 10_000);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let (config, source) = load_config(Some(&path)).await.unwrap();
        assert_eq!(source, ConfigSource::MissingFile(path));
        assert_eq!(config.actions_dir, PathBuf::from("./actions"));
        assert!(config.log_dir.is_none());
    }

    #[tokio::test]
    async fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "actions_dir: [unclosed\n").await.unwrap();

        assert!(load_config(Some(&path)).await.is_err());
    }

    #[test]
    fn budgets_convert_to_driver_timeouts() {
        let timeouts = TimeoutsConfig {
            page_ready_ms: 1,
            element_visible_ms: 2,
            clickable_ms: 3,
        };
        let driver = timeouts.to_driver_timeouts();
        assert_eq!(driver.page_ready_ms, 1);
        assert_eq!(driver.element_visible_ms, 2);
        assert_eq!(driver.clickable_ms, 3);
    }
}
