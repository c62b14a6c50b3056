//! W3C WebDriver client over HTTP
//!
//! Speaks the JSON wire format understood by chromedriver, geckodriver and
//! Selenium Grid. Every response carries a `value`; failures carry
//! `value.error` and `value.message`.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

use checkrun_common::{Error, Result, UiConfig};

use crate::driver::{BrowserDriver, DriverFactory, ElementId};

/// Key under which the protocol wraps element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4a5b6e8a3a2c";

/// Live WebDriver session
pub struct WebDriverSession {
    client: reqwest::Client,
    endpoint: String,
    session_id: String,
}

impl WebDriverSession {
    /// Create a session on the remote end described by `config`
    pub async fn start(config: &UiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(format!("WebDriver client: {}", e)))?;
        let endpoint = config.webdriver_url.trim_end_matches('/').to_string();

        let body = json!({ "capabilities": { "alwaysMatch": capabilities(config) } });
        let value = send(&client, &endpoint, Method::POST, "/session", Some(body), None).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Driver("session response without sessionId".to_string()))?
            .to_string();

        tracing::debug!("WebDriver session {} started at {}", session_id, endpoint);

        Ok(Self {
            client,
            endpoint,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let path = format!("/session/{}{}", self.session_id, path);
        send(&self.client, &self.endpoint, method, &path, body, None).await
    }

    async fn element_command(&self, method: Method, path: &str, body: Option<Value>, selector: &str) -> Result<Value> {
        let path = format!("/session/{}{}", self.session_id, path);
        send(&self.client, &self.endpoint, method, &path, body, Some(selector)).await
    }
}

#[async_trait]
impl BrowserDriver for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.command(Method::GET, "/url", None).await?;
        as_string(value)
    }

    async fn find_element(&self, xpath: &str) -> Result<ElementId> {
        let body = json!({ "using": "xpath", "value": xpath });
        let value = self
            .element_command(Method::POST, "/element", Some(body), xpath)
            .await?;
        element_id(&value)
    }

    async fn find_elements_within(&self, parent: &ElementId, xpath: &str) -> Result<Vec<ElementId>> {
        let body = json!({ "using": "xpath", "value": xpath });
        let path = format!("/element/{}/elements", parent.as_str());
        let value = self
            .element_command(Method::POST, &path, Some(body), xpath)
            .await?;
        match value {
            Value::Array(items) => items.iter().map(element_id).collect(),
            other => Err(Error::Driver(format!("expected element list, got {}", other))),
        }
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool> {
        let path = format!("/element/{}/displayed", element.as_str());
        let value = self.command(Method::GET, &path, None).await?;
        value
            .as_bool()
            .ok_or_else(|| Error::Driver(format!("expected boolean, got {}", value)))
    }

    async fn click(&self, element: &ElementId) -> Result<()> {
        let path = format!("/element/{}/click", element.as_str());
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    async fn hover_then_click(&self, hover: &ElementId, target: &ElementId) -> Result<()> {
        let body = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [
                    { "type": "pointerMove", "duration": 0, "origin": { ELEMENT_KEY: hover.as_str() }, "x": 0, "y": 0 },
                    { "type": "pointerMove", "duration": 250, "origin": { ELEMENT_KEY: target.as_str() }, "x": 0, "y": 0 },
                    { "type": "pointerDown", "button": 0 },
                    { "type": "pointerUp", "button": 0 }
                ]
            }]
        });
        self.command(Method::POST, "/actions", Some(body)).await?;
        self.command(Method::DELETE, "/actions", None).await?;
        Ok(())
    }

    async fn text(&self, element: &ElementId) -> Result<String> {
        let path = format!("/element/{}/text", element.as_str());
        let value = self.command(Method::GET, &path, None).await?;
        as_string(value)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self.command(Method::GET, "/screenshot", None).await?;
        let encoded = as_string(value)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Driver(format!("screenshot is not base64: {}", e)))
    }

    async fn maximize(&self) -> Result<()> {
        self.command(Method::POST, "/window/maximize", Some(json!({}))).await?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        let path = format!("/session/{}", self.session_id);
        send(&self.client, &self.endpoint, Method::DELETE, &path, None, None).await?;
        tracing::debug!("WebDriver session {} closed", self.session_id);
        Ok(())
    }
}

/// Starts [`WebDriverSession`]s from the UI configuration
pub struct WebDriverFactory {
    config: UiConfig,
}

impl WebDriverFactory {
    pub fn new(config: UiConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverFactory for WebDriverFactory {
    async fn start(&self) -> Result<Box<dyn BrowserDriver>> {
        Ok(Box::new(WebDriverSession::start(&self.config).await?))
    }
}

/// `alwaysMatch` capabilities for the configured browser
pub fn capabilities(config: &UiConfig) -> Value {
    let browser = config.browser.to_ascii_lowercase();
    let mut caps = json!({ "browserName": browser });
    match browser.as_str() {
        "chrome" | "chromium" | "msedge" => {
            let mut args = vec!["--start-maximized"];
            if config.headless {
                args.push("--headless=new");
            }
            let key = if browser == "msedge" { "ms:edgeOptions" } else { "goog:chromeOptions" };
            caps[key] = json!({ "args": args });
        }
        "firefox" if config.headless => {
            caps["moz:firefoxOptions"] = json!({ "args": ["-headless"] });
        }
        _ => {}
    }
    caps
}

async fn send(
    client: &reqwest::Client,
    endpoint: &str,
    method: Method,
    path: &str,
    body: Option<Value>,
    selector: Option<&str>,
) -> Result<Value> {
    let url = format!("{}{}", endpoint, path);
    let mut request = client.request(method.clone(), &url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let transport_err = |e: reqwest::Error| Error::Transport {
        method: method.to_string(),
        endpoint: url.clone(),
        message: e.to_string(),
    };
    let response = request.send().await.map_err(transport_err)?;
    let status = response.status();
    let payload: Value = response.json().await.map_err(transport_err)?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }

    let error = value.get("error").and_then(Value::as_str).unwrap_or("unknown error");
    let message = value.get("message").and_then(Value::as_str).unwrap_or("");
    match (error, selector) {
        ("no such element", Some(selector)) => Err(Error::ElementNotFound {
            selector: selector.to_string(),
        }),
        _ => Err(Error::Driver(format!("{} ({}): {}", error, status.as_u16(), message))),
    }
}

fn element_id(value: &Value) -> Result<ElementId> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementId(id.to_string()))
        .ok_or_else(|| Error::Driver(format!("expected element reference, got {}", value)))
}

fn as_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::Driver(format!("expected string, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_headless_capabilities() {
        let config = UiConfig {
            headless: true,
            ..UiConfig::default()
        };
        let caps = capabilities(&config);
        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
    }

    #[test]
    fn test_firefox_capabilities() {
        let config = UiConfig {
            browser: "Firefox".into(),
            headless: false,
            ..UiConfig::default()
        };
        assert_eq!(capabilities(&config), json!({ "browserName": "firefox" }));
    }

    #[test]
    fn test_element_id() {
        let value = json!({ ELEMENT_KEY: "abc" });
        assert_eq!(element_id(&value).unwrap(), ElementId("abc".into()));
        assert!(element_id(&json!({})).is_err());
    }
}
