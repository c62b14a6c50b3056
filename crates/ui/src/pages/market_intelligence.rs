use checkrun_common::Result;

use super::{locate, Page};
use crate::driver::BrowserDriver;
use crate::locator::{keys, LocatorResolver};

/// Market Intelligence solution page
pub struct MarketIntelligencePage<'a> {
    driver: &'a dyn BrowserDriver,
    locators: &'a dyn LocatorResolver,
}

impl<'a> MarketIntelligencePage<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, locators: &'a dyn LocatorResolver) -> Self {
        Self { driver, locators }
    }

    /// Heading texts inside the "Ways You Benefit" section, in document order
    pub async fn benefit_headings(&self) -> Result<Vec<String>> {
        let section = locate(self, keys::BENEFIT_HEADINGS_SECTION).await?;
        let heading_xpath = self.selector(keys::DIV_WITH_HEADINGS)?;

        let mut headings = Vec::new();
        for element in self.driver.find_elements_within(&section, &heading_xpath).await? {
            headings.push(self.driver.text(&element).await?);
        }
        Ok(headings)
    }

    pub async fn click_get_started(&self) -> Result<()> {
        let button = locate(self, keys::LETS_GET_STARTED_BUTTON).await?;
        self.driver.click(&button).await
    }
}

impl Page for MarketIntelligencePage<'_> {
    const NAME: &'static str = keys::MARKET_INTELLIGENCE_PAGE;

    fn driver(&self) -> &dyn BrowserDriver {
        self.driver
    }

    fn locators(&self) -> &dyn LocatorResolver {
        self.locators
    }
}
