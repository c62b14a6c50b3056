//! UI suite - Market Intelligence to Contact workflow

use async_trait::async_trait;
use std::sync::Arc;

use checkrun_common::{
    check, CaseContext, CaseList, CaseResult, Coordinator, Result, RunConfig, RunSummary, TestCase,
    Track,
};

use crate::driver::{BrowserDriver, DriverFactory};
use crate::fixture::UiFixture;
use crate::locator::{JsonLocatorConfig, LocatorResolver, StaticLocators};
use crate::pages::{ContactPage, HomePage, MarketIntelligencePage};
use crate::wait::Wait;
use crate::webdriver::WebDriverFactory;

/// Start URL to contact form through the Solutions menu
pub struct MarketIntelligenceWorkflow {
    start_url: String,
    locators: Arc<dyn LocatorResolver>,
    wait: Wait,
}

impl MarketIntelligenceWorkflow {
    pub fn new(start_url: impl Into<String>, locators: Arc<dyn LocatorResolver>, wait: Wait) -> Self {
        Self {
            start_url: start_url.into(),
            locators,
            wait,
        }
    }
}

#[async_trait]
impl TestCase<Box<dyn BrowserDriver>> for MarketIntelligenceWorkflow {
    fn name(&self) -> String {
        "MarketIntelligenceWorkflow_ValidateContactPageLoad".to_string()
    }

    fn description(&self) -> Option<&str> {
        Some("Clicking 'Let's Get Started' on the Market Intelligence page navigates to the Contact page.")
    }

    async fn run(&self, driver: &mut Box<dyn BrowserDriver>, ctx: &CaseContext<'_>) -> CaseResult {
        let driver: &dyn BrowserDriver = driver.as_ref();
        let locators = self.locators.as_ref();

        let home = HomePage::new(driver, locators);
        let market_intelligence = MarketIntelligencePage::new(driver, locators);
        let contact = ContactPage::new(driver, locators, self.wait);
        ctx.log("Page objects initialized.");

        driver.navigate(&self.start_url).await?;
        ctx.log(format!("Navigated to {}", self.start_url));

        home.open_market_intelligence().await?;
        ctx.log("Clicked on 'Solutions' > 'Market Intelligence'");

        let headings = market_intelligence.benefit_headings().await?;
        check!(
            !headings.is_empty(),
            "Expected headings in 'Ways You Benefit' section."
        );
        ctx.log(format!("Benefit headings count: {}", headings.len()));

        market_intelligence.click_get_started().await?;
        ctx.log("'Let's Get Started' button clicked.");

        check!(contact.is_loaded().await?, "Expected 'Contact' page to be displayed.");
        ctx.log("'Contact' page loaded successfully.");

        check!(
            contact.is_contact_form_displayed().await?,
            "Expected 'Contact' form to be displayed."
        );
        ctx.log("'Contact' form displayed successfully.");
        Ok(())
    }
}

/// Every UI case in execution order
pub fn ui_suite(config: &RunConfig, locators: Arc<dyn LocatorResolver>) -> CaseList<Box<dyn BrowserDriver>> {
    let wait = Wait::new(config.ui.wait_timeout(), config.ui.poll_interval());
    vec![Box::new(MarketIntelligenceWorkflow::new(
        config.ui.start_url.clone(),
        locators,
        wait,
    ))]
}

/// Locators from the configured document, or the bundled ones when it is absent
pub fn configured_locators(config: &RunConfig) -> Result<Arc<dyn LocatorResolver>> {
    let path = &config.ui.locators_path;
    if path.exists() {
        Ok(Arc::new(JsonLocatorConfig::new(path.clone())))
    } else {
        tracing::warn!(
            "Locator document {} not found, using bundled UiPaths.json",
            path.display()
        );
        Ok(Arc::new(StaticLocators::builtin()?))
    }
}

/// Run the UI track against the configured WebDriver endpoint
pub async fn run_ui(config: &RunConfig) -> Result<RunSummary> {
    let factory = Arc::new(WebDriverFactory::new(config.ui.clone()));
    let locators = configured_locators(config)?;
    run_ui_with(config, factory, locators).await
}

/// Run the UI track with a caller-supplied driver factory and locators
pub async fn run_ui_with(
    config: &RunConfig,
    factory: Arc<dyn DriverFactory>,
    locators: Arc<dyn LocatorResolver>,
) -> Result<RunSummary> {
    Coordinator::run_track(Track::Ui, config, |_run| {
        let fixture = UiFixture::new(factory, config.snapshots_dir());
        Ok((fixture, ui_suite(config, locators)))
    })
    .await
}
