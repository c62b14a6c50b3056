use checkrun_common::Result;

use super::{locate, Page};
use crate::driver::BrowserDriver;
use crate::locator::{keys, LocatorResolver};
use crate::wait::Wait;

/// URL fragment identifying the contact page
pub const CONTACT_URL_FRAGMENT: &str = "contact";

/// Contact page reached from "Let's Get Started"
pub struct ContactPage<'a> {
    driver: &'a dyn BrowserDriver,
    locators: &'a dyn LocatorResolver,
    wait: Wait,
}

impl<'a> ContactPage<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, locators: &'a dyn LocatorResolver, wait: Wait) -> Self {
        Self {
            driver,
            locators,
            wait,
        }
    }

    /// Polls the current URL until it contains `contact` or the wait runs out
    pub async fn is_loaded(&self) -> Result<bool> {
        let driver = self.driver;
        self.wait
            .until(move || async move {
                let url = driver.current_url().await?;
                Ok(url.contains(CONTACT_URL_FRAGMENT))
            })
            .await
    }

    pub async fn is_contact_form_displayed(&self) -> Result<bool> {
        let form = locate(self, keys::CONTACT_FORM).await?;
        self.driver.is_displayed(&form).await
    }

    pub async fn heading(&self) -> Result<String> {
        let heading = locate(self, keys::CONTACT_PAGE_HEADING).await?;
        self.driver.text(&heading).await
    }
}

impl Page for ContactPage<'_> {
    const NAME: &'static str = keys::CONTACT_PAGE;

    fn driver(&self) -> &dyn BrowserDriver {
        self.driver
    }

    fn locators(&self) -> &dyn LocatorResolver {
        self.locators
    }
}
