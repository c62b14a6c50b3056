//! checkrun UI track
//!
//! Drives a browser through page objects over the W3C WebDriver protocol.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  UiFixture (per case)                                        │
//! │    setup     -> DriverFactory::start() + maximize            │
//! │    on_failure-> screenshot -> Screenshots/<case>.png         │
//! │    teardown  -> quit (always)                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Page objects: HomePage, MarketIntelligencePage, ContactPage │
//! │    selector = LocatorResolver::resolve(page, key) per call   │
//! │    state queries poll with Wait { timeout, interval }        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  BrowserDriver  <- WebDriverSession (reqwest, JSON wire)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod driver;
pub mod fixture;
pub mod locator;
pub mod pages;
pub mod suite;
pub mod wait;
pub mod webdriver;

pub use driver::{BrowserDriver, DriverFactory, ElementId};
pub use fixture::UiFixture;
pub use locator::{JsonLocatorConfig, LocatorResolver, StaticLocators};
pub use suite::{run_ui, run_ui_with, ui_suite};
pub use wait::Wait;
pub use webdriver::{WebDriverFactory, WebDriverSession};
