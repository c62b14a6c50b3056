//! Per-case browser session with a snapshot on failure

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use checkrun_common::{CaseContext, CaseFixture, Error, Result};

use crate::driver::{BrowserDriver, DriverFactory};

/// Starts a maximized session before each case and always quits it after
pub struct UiFixture {
    factory: Arc<dyn DriverFactory>,
    snapshots_dir: PathBuf,
}

impl UiFixture {
    pub fn new(factory: Arc<dyn DriverFactory>, snapshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            factory,
            snapshots_dir: snapshots_dir.into(),
        }
    }

    pub fn snapshots_dir(&self) -> &Path {
        &self.snapshots_dir
    }

    /// `<snapshots_dir>/<case name>.png`
    pub fn snapshot_path(&self, case_name: &str) -> PathBuf {
        self.snapshots_dir.join(format!("{}.png", file_stem(case_name)))
    }
}

#[async_trait]
impl CaseFixture for UiFixture {
    type Resource = Box<dyn BrowserDriver>;

    async fn setup(&mut self, ctx: &CaseContext<'_>) -> Result<Box<dyn BrowserDriver>> {
        let driver = self.factory.start().await?;
        if let Err(e) = driver.maximize().await {
            if let Err(quit_err) = driver.quit().await {
                ctx.diagnostics()
                    .error("Failed to close browser after setup error", Some(&quit_err));
            }
            return Err(e);
        }
        ctx.log("Browser initialized and maximized.");
        Ok(driver)
    }

    /// Viewport PNG from the WebDriver screenshot command, written as `<case>.png`
    async fn on_failure(&mut self, driver: &mut Box<dyn BrowserDriver>, ctx: &CaseContext<'_>) -> Result<()> {
        let png = driver.screenshot().await?;

        tokio::fs::create_dir_all(&self.snapshots_dir)
            .await
            .map_err(|e| Error::SinkInit {
                path: self.snapshots_dir.display().to_string(),
                reason: e.to_string(),
            })?;
        let path = self.snapshot_path(ctx.name());
        tokio::fs::write(&path, &png).await?;

        let digest = hex::encode(Sha256::digest(&png));
        ctx.log(format!("Screenshot taken: {} (sha256 {})", path.display(), digest));
        ctx.report(format!("Screenshot taken: {}", path.display()));
        Ok(())
    }

    async fn teardown(&mut self, driver: Box<dyn BrowserDriver>, ctx: &CaseContext<'_>) -> Result<()> {
        let quit = driver.quit().await;
        ctx.log("Test ended and browser closed.");
        quit
    }
}

/// Case name made safe for use as a file name
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(
            file_stem("MarketIntelligenceWorkflow_ValidateContactPageLoad"),
            "MarketIntelligenceWorkflow_ValidateContactPageLoad"
        );
        assert_eq!(file_stem("Case(1,\"a/b\")"), "Case(1,_a_b_)");
    }
}
