//! Run configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::Track;

/// Default remote system for the API track
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default landing page for the UI track
pub const DEFAULT_START_URL: &str = "https://www.agdata.com";

/// Run configuration shared by both tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base endpoint for the transport adapter
    pub base_url: Option<String>,

    /// Root directory for logs, reports and snapshots
    pub artifacts_dir: PathBuf,

    /// Connection timeout for the HTTP transport
    pub connect_timeout_secs: u64,

    /// UI track configuration
    pub ui: UiConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            artifacts_dir: PathBuf::from("artifacts"),
            connect_timeout_secs: 10,
            ui: UiConfig::default(),
        }
    }
}

/// Browser-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page the UI suite navigates to first
    pub start_url: String,

    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    pub webdriver_url: String,

    /// Browser name passed in the session capabilities
    pub browser: String,

    /// Launch the browser without a window
    pub headless: bool,

    /// Bounded wait used by state polling
    pub wait_timeout_secs: u64,

    /// Interval between polls
    pub poll_interval_ms: u64,

    /// JSON document mapping page:key to selectors
    pub locators_path: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            webdriver_url: "http://127.0.0.1:9515".to_string(),
            browser: "chrome".to_string(),
            headless: false,
            wait_timeout_secs: 10,
            poll_interval_ms: 500,
            locators_path: PathBuf::from("UiPaths.json"),
        }
    }
}

impl UiConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl RunConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Base endpoint, required at first transport use
    pub fn base_url(&self) -> Result<&str> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(Error::MissingBaseUrl),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.artifacts_dir.join("Logs")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.artifacts_dir.join("Reports")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.artifacts_dir.join("Screenshots")
    }

    /// Diagnostic log path for a track, before the day suffix is applied
    pub fn log_path(&self, track: Track) -> PathBuf {
        self.logs_dir().join(track.log_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.base_url().unwrap(), DEFAULT_BASE_URL);
        assert_eq!(config.ui.wait_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("checkrun.toml");
        std::fs::write(
            &path,
            r#"
base_url = "http://127.0.0.1:3000"
artifacts_dir = "/tmp/checkrun"

[ui]
wait_timeout_secs = 3
"#,
        )
        .unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:3000");
        assert_eq!(config.ui.wait_timeout_secs, 3);
        assert_eq!(config.ui.poll_interval_ms, 500);
        assert_eq!(
            config.log_path(Track::Api),
            PathBuf::from("/tmp/checkrun/Logs/api-test-logs.txt")
        );
    }

    #[test]
    fn test_blank_base_url_is_missing() {
        let config = RunConfig {
            base_url: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(config.base_url(), Err(Error::MissingBaseUrl)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "base_url = [").unwrap();
        assert!(matches!(RunConfig::load(&path), Err(Error::Config(_))));
    }
}
