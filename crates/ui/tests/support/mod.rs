//! Scripted in-memory browser

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use checkrun_common::{Error, Result, RunConfig, UiConfig};
use checkrun_ui::locator::keys;
use checkrun_ui::{BrowserDriver, DriverFactory, ElementId, LocatorResolver, StaticLocators};

/// Smallest valid PNG signature plus a marker
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-frame";

pub const START_URL: &str = "https://www.agdata.com";
pub const CONTACT_URL: &str = "https://www.agdata.com/contact/";

#[derive(Default)]
pub struct Dom {
    pub url: String,
    /// document-level xpath -> element id
    pub elements: HashMap<String, String>,
    /// (parent id, relative xpath) -> child ids
    pub children: HashMap<(String, String), Vec<String>>,
    pub texts: HashMap<String, String>,
    pub displayed: HashSet<String>,
    /// element id -> url the click navigates to
    pub links: HashMap<String, String>,
    pub events: Vec<String>,
    pub started: usize,
    pub quit: usize,
    pub fail_start: bool,
    pub fail_quit: bool,
    pub fail_screenshot: bool,
}

pub type SharedDom = Arc<Mutex<Dom>>;

fn selector(page: &str, key: &str) -> String {
    StaticLocators::builtin().unwrap().resolve(page, key).unwrap()
}

/// DOM that satisfies the Market Intelligence workflow with the bundled locators
pub fn agdata_site() -> SharedDom {
    let mut dom = Dom::default();

    dom.elements.insert(selector(keys::HOME_PAGE, keys::SOLUTIONS_MENU), "solutions".into());
    dom.elements.insert(
        selector(keys::HOME_PAGE, keys::MARKET_INTELLIGENCE_SUBMENU),
        "mi-link".into(),
    );
    dom.links.insert("mi-link".into(), "https://www.agdata.com/market-intelligence/".into());

    dom.elements.insert(
        selector(keys::MARKET_INTELLIGENCE_PAGE, keys::BENEFIT_HEADINGS_SECTION),
        "benefits".into(),
    );
    dom.children.insert(
        ("benefits".into(), selector(keys::MARKET_INTELLIGENCE_PAGE, keys::DIV_WITH_HEADINGS)),
        vec!["h1".into(), "h2".into(), "h3".into()],
    );
    dom.texts.insert("h1".into(), "Reduce Risk".into());
    dom.texts.insert("h2".into(), "Grow Revenue".into());
    dom.texts.insert("h3".into(), "Save Time".into());

    dom.elements.insert(
        selector(keys::MARKET_INTELLIGENCE_PAGE, keys::LETS_GET_STARTED_BUTTON),
        "get-started".into(),
    );
    dom.links.insert("get-started".into(), CONTACT_URL.into());

    dom.elements.insert(selector(keys::CONTACT_PAGE, keys::CONTACT_FORM), "form".into());
    dom.displayed.insert("form".into());

    Arc::new(Mutex::new(dom))
}

pub struct FakeDriver {
    dom: SharedDom,
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.events.push(format!("navigate {}", url));
        dom.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.dom.lock().url.clone())
    }

    async fn find_element(&self, xpath: &str) -> Result<ElementId> {
        self.dom
            .lock()
            .elements
            .get(xpath)
            .map(|id| ElementId(id.clone()))
            .ok_or_else(|| Error::ElementNotFound {
                selector: xpath.to_string(),
            })
    }

    async fn find_elements_within(&self, parent: &ElementId, xpath: &str) -> Result<Vec<ElementId>> {
        let dom = self.dom.lock();
        let key = (parent.0.clone(), xpath.to_string());
        Ok(dom
            .children
            .get(&key)
            .map(|ids| ids.iter().map(|id| ElementId(id.clone())).collect())
            .unwrap_or_default())
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool> {
        Ok(self.dom.lock().displayed.contains(&element.0))
    }

    async fn click(&self, element: &ElementId) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.events.push(format!("click {}", element.0));
        if let Some(url) = dom.links.get(&element.0).cloned() {
            dom.url = url;
        }
        Ok(())
    }

    async fn hover_then_click(&self, hover: &ElementId, target: &ElementId) -> Result<()> {
        self.dom.lock().events.push(format!("hover {}", hover.0));
        self.click(target).await
    }

    async fn text(&self, element: &ElementId) -> Result<String> {
        Ok(self.dom.lock().texts.get(&element.0).cloned().unwrap_or_default())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let mut dom = self.dom.lock();
        dom.events.push("screenshot".into());
        if dom.fail_screenshot {
            return Err(Error::Driver("unable to capture screen".into()));
        }
        Ok(FAKE_PNG.to_vec())
    }

    async fn maximize(&self) -> Result<()> {
        self.dom.lock().events.push("maximize".into());
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.events.push("quit".into());
        dom.quit += 1;
        if dom.fail_quit {
            return Err(Error::Driver("chrome not reachable".into()));
        }
        Ok(())
    }
}

pub struct FakeFactory {
    pub dom: SharedDom,
}

#[async_trait]
impl DriverFactory for FakeFactory {
    async fn start(&self) -> Result<Box<dyn BrowserDriver>> {
        let mut dom = self.dom.lock();
        if dom.fail_start {
            return Err(Error::Driver("session not created".into()));
        }
        dom.started += 1;
        dom.url = "about:blank".into();
        Ok(Box::new(FakeDriver {
            dom: Arc::clone(&self.dom),
        }))
    }
}

pub fn config(artifacts: &Path) -> RunConfig {
    RunConfig {
        artifacts_dir: artifacts.to_path_buf(),
        ui: UiConfig {
            start_url: START_URL.into(),
            wait_timeout_secs: 1,
            poll_interval_ms: 20,
            ..UiConfig::default()
        },
        ..RunConfig::default()
    }
}
