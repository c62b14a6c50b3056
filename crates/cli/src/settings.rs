//! Run configuration assembled from file, environment and flags

use clap::Args;
use std::path::PathBuf;

use checkrun_common::RunConfig;

/// Flags that override values from the configuration file
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Configuration file (TOML); defaults apply when it does not exist
    #[arg(long, env = "CHECKRUN_CONFIG", default_value = "checkrun.toml", global = true)]
    pub config: PathBuf,

    /// Base endpoint of the API under test
    #[arg(long, env = "CHECKRUN_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Directory for logs, reports and screenshots
    #[arg(long, global = true)]
    pub artifacts: Option<PathBuf>,

    /// WebDriver endpoint for the UI track
    #[arg(long, env = "CHECKRUN_WEBDRIVER_URL", global = true)]
    pub webdriver_url: Option<String>,

    /// Locator document for the UI track
    #[arg(long, global = true)]
    pub locators: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    pub headless: bool,
}

impl ConfigArgs {
    /// Load the file, then apply flag overrides
    pub fn resolve(&self) -> checkrun_common::Result<RunConfig> {
        let mut config = RunConfig::load(&self.config)?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(dir) = &self.artifacts {
            config.artifacts_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.ui.webdriver_url = url.clone();
        }
        if let Some(path) = &self.locators {
            config.ui.locators_path = path.clone();
        }
        if self.headless {
            config.ui.headless = true;
        }
    }
}
