//! Browser driver contract
//!
//! Page objects and the UI fixture only talk to a browser through
//! [`BrowserDriver`]. Selectors are XPath expressions.

use async_trait::async_trait;

use checkrun_common::Result;

/// Opaque reference to an element in the live DOM
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One exclusively owned browser session
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// First match for `xpath` in the document; `ElementNotFound` if none
    async fn find_element(&self, xpath: &str) -> Result<ElementId>;

    /// All matches for `xpath` below `parent`, possibly empty
    async fn find_elements_within(&self, parent: &ElementId, xpath: &str) -> Result<Vec<ElementId>>;

    async fn is_displayed(&self, element: &ElementId) -> Result<bool>;

    async fn click(&self, element: &ElementId) -> Result<()>;

    /// Move the pointer over `hover`, then onto `target` and click it
    async fn hover_then_click(&self, hover: &ElementId, target: &ElementId) -> Result<()>;

    /// Rendered text of an element
    async fn text(&self, element: &ElementId) -> Result<String>;

    /// PNG of the current viewport (W3C `Take Screenshot`, not full-page)
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn maximize(&self) -> Result<()>;

    /// End the session and release the browser process
    async fn quit(&self) -> Result<()>;
}

/// Starts a fresh browser session per case
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn start(&self) -> Result<Box<dyn BrowserDriver>>;
}
