use checkrun_common::Result;

use super::{locate, Page};
use crate::driver::BrowserDriver;
use crate::locator::{keys, LocatorResolver};

/// Landing page with the main navigation
pub struct HomePage<'a> {
    driver: &'a dyn BrowserDriver,
    locators: &'a dyn LocatorResolver,
}

impl<'a> HomePage<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, locators: &'a dyn LocatorResolver) -> Self {
        Self { driver, locators }
    }

    /// Hover Solutions, then click Market Intelligence in its submenu
    pub async fn open_market_intelligence(&self) -> Result<()> {
        let menu = locate(self, keys::SOLUTIONS_MENU).await?;
        let submenu = locate(self, keys::MARKET_INTELLIGENCE_SUBMENU).await?;
        self.driver.hover_then_click(&menu, &submenu).await
    }
}

impl Page for HomePage<'_> {
    const NAME: &'static str = keys::HOME_PAGE;

    fn driver(&self) -> &dyn BrowserDriver {
        self.driver
    }

    fn locators(&self) -> &dyn LocatorResolver {
        self.locators
    }
}
