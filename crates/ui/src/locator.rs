//! Locator configuration
//!
//! Selectors live in a JSON document keyed by page name, then element key:
//!
//! ```json
//! { "HomePage": { "SolutionsMenu": "//nav//a[normalize-space()='Solutions']" } }
//! ```
//!
//! Resolution happens at every call. A missing key is a configuration
//! fault raised at that moment, never earlier.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use checkrun_common::{Error, Result};

/// Page and element key names used by the page objects
pub mod keys {
    pub const HOME_PAGE: &str = "HomePage";
    pub const MARKET_INTELLIGENCE_PAGE: &str = "MarketIntelligencePage";
    pub const CONTACT_PAGE: &str = "ContactPage";

    pub const SOLUTIONS_MENU: &str = "SolutionsMenu";
    pub const MARKET_INTELLIGENCE_SUBMENU: &str = "MarketIntelligenceSubmenu";
    pub const BENEFIT_HEADINGS_SECTION: &str = "BenefitHeadingsSection";
    pub const DIV_WITH_HEADINGS: &str = "DivWithHeadings";
    pub const LETS_GET_STARTED_BUTTON: &str = "LetsGetStartedButton";
    pub const CONTACT_FORM: &str = "ContactForm";
    pub const CONTACT_PAGE_HEADING: &str = "ContactPageHeading";
}

/// Locator document shipped with the crate
pub const DEFAULT_LOCATORS: &str = include_str!("../UiPaths.json");

type LocatorTable = HashMap<String, HashMap<String, String>>;

/// Maps `(page, key)` to a selector
pub trait LocatorResolver: Send + Sync {
    fn resolve(&self, page: &str, key: &str) -> Result<String>;
}

fn lookup(table: &LocatorTable, page: &str, key: &str) -> Result<String> {
    table
        .get(page)
        .and_then(|keys| keys.get(key))
        .cloned()
        .ok_or_else(|| Error::MissingLocator {
            page: page.to_string(),
            key: key.to_string(),
        })
}

fn parse(source: &str, origin: &str) -> Result<LocatorTable> {
    serde_json::from_str(source)
        .map_err(|e| Error::Config(format!("locator document {}: {}", origin, e)))
}

/// In-memory locator table
#[derive(Debug, Clone, Default)]
pub struct StaticLocators {
    table: LocatorTable,
}

impl StaticLocators {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(Self {
            table: parse(source, "<inline>")?,
        })
    }

    /// Locators bundled in `UiPaths.json`
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_LOCATORS)
    }

    pub fn insert(&mut self, page: &str, key: &str, selector: &str) {
        self.table
            .entry(page.to_string())
            .or_default()
            .insert(key.to_string(), selector.to_string());
    }

    pub fn remove(&mut self, page: &str, key: &str) {
        if let Some(keys) = self.table.get_mut(page) {
            keys.remove(key);
        }
    }
}

impl LocatorResolver for StaticLocators {
    fn resolve(&self, page: &str, key: &str) -> Result<String> {
        lookup(&self.table, page, key)
    }
}

struct Loaded {
    modified: Option<SystemTime>,
    table: LocatorTable,
}

/// File-backed locator document, re-read when its modification time changes
pub struct JsonLocatorConfig {
    path: PathBuf,
    loaded: Mutex<Option<Loaded>>,
}

impl JsonLocatorConfig {
    /// Does not touch the file; it is read at first resolution
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Result<Option<SystemTime>> {
        let meta = std::fs::metadata(&self.path).map_err(|e| {
            Error::Config(format!("locator document {}: {}", self.path.display(), e))
        })?;
        Ok(meta.modified().ok())
    }
}

impl LocatorResolver for JsonLocatorConfig {
    fn resolve(&self, page: &str, key: &str) -> Result<String> {
        let modified = self.modified()?;
        let mut loaded = self.loaded.lock();

        let stale = match loaded.as_ref() {
            Some(current) => modified.is_none() || current.modified != modified,
            None => true,
        };
        if stale {
            let source = std::fs::read_to_string(&self.path)?;
            let table = parse(&source, &self.path.display().to_string())?;
            tracing::debug!("Loaded locator document {}", self.path.display());
            *loaded = Some(Loaded { modified, table });
        }

        match loaded.as_ref() {
            Some(current) => lookup(&current.table, page, key),
            None => Err(Error::Internal("locator document not loaded".to_string())),
        }
    }
}
