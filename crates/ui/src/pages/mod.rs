//! Page objects, one per screen
//!
//! Every page holds the session handle and the locator resolver and looks
//! selectors up when an action runs. Resolution and lookup faults are
//! returned to the caller untouched.

use checkrun_common::Result;

use crate::driver::{BrowserDriver, ElementId};
use crate::locator::LocatorResolver;

mod contact;
mod home;
mod market_intelligence;

pub use contact::ContactPage;
pub use home::HomePage;
pub use market_intelligence::MarketIntelligencePage;

/// Capability shared by every screen: locate elements by locator key
pub trait Page {
    /// Page name used as the first half of each locator key
    const NAME: &'static str;

    fn driver(&self) -> &dyn BrowserDriver;

    fn locators(&self) -> &dyn LocatorResolver;

    fn selector(&self, key: &str) -> Result<String> {
        self.locators().resolve(Self::NAME, key)
    }
}

/// Resolve `key` on page `P` and find the element
pub(crate) async fn locate<P: Page + Sync>(page: &P, key: &str) -> Result<ElementId> {
    let selector = page.selector(key)?;
    page.driver().find_element(&selector).await
}
