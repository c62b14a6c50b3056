//! Transport adapter - HTTP verbs against one base endpoint
//!
//! A non-2xx status is a normal outcome (`success == false`), never an
//! error. Only connection, DNS and timeout faults surface as
//! [`Error::Transport`]. Every call is logged before dispatch and after
//! completion.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use checkrun_common::{DiagnosticSink, Error, Result, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Normalized result of one remote call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: u16,
    pub body: String,
    /// Media type without parameters, e.g. `application/json`
    pub content_type: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
    pub elapsed_ms: u64,
}

impl ResponseEnvelope {
    /// Decode the body on demand
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Remote call capability consumed by the domain services
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> Result<ResponseEnvelope>;

    async fn get(&self, endpoint: &str) -> Result<ResponseEnvelope> {
        self.send(HttpMethod::Get, endpoint, None).await
    }

    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<ResponseEnvelope> {
        self.send(HttpMethod::Post, endpoint, body).await
    }

    async fn put(&self, endpoint: &str, body: Option<&Value>) -> Result<ResponseEnvelope> {
        self.send(HttpMethod::Put, endpoint, body).await
    }

    async fn delete(&self, endpoint: &str) -> Result<ResponseEnvelope> {
        self.send(HttpMethod::Delete, endpoint, None).await
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<String>,
    diagnostics: Arc<DiagnosticSink>,
}

impl HttpTransport {
    /// Build the client. A missing base endpoint is reported at first use.
    pub fn new(config: &RunConfig, diagnostics: Arc<DiagnosticSink>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {}", e)))?;

        let base_url = config.base_url().ok().map(str::to_string);
        match &base_url {
            Some(url) => tracing::debug!("HTTP transport targeting {}", url),
            None => tracing::debug!("HTTP transport created without a base endpoint"),
        }

        Ok(Self {
            client,
            base_url,
            diagnostics,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url_for(&self, endpoint: &str) -> Result<String> {
        let base = self.base_url.as_deref().ok_or(Error::MissingBaseUrl)?;
        Ok(join_url(base, endpoint))
    }

    fn fault(&self, method: HttpMethod, endpoint: &str, e: reqwest::Error) -> Error {
        let err = Error::Transport {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        };
        self.diagnostics
            .error(format!("{} {} did not complete", method, endpoint), Some(&err));
        err
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> Result<ResponseEnvelope> {
        let url = self.url_for(endpoint)?;
        self.diagnostics
            .info(format!("Created {} request for {}", method, endpoint));

        let mut request = self.client.request(method.into(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.fault(method, endpoint, e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type);
        let text = response
            .text()
            .await
            .map_err(|e| self.fault(method, endpoint, e))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let success = status.is_success();
        let error_message = if success {
            None
        } else {
            Some(status.canonical_reason().unwrap_or("Unknown status").to_string())
        };

        self.diagnostics
            .info(format!("Response Status Code: {}", status.as_u16()));
        self.diagnostics.info(format!("Response Content: {}", text));
        if let Some(err) = &error_message {
            self.diagnostics.error(
                format!("Request failed with status {}: {}", status.as_u16(), err),
                None,
            );
        }

        Ok(ResponseEnvelope {
            method,
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: text,
            content_type,
            success,
            error_message,
            elapsed_ms,
        })
    }
}

/// Join base and endpoint with exactly one slash; query strings pass through
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or(header)
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        let base = "https://jsonplaceholder.typicode.com";
        assert_eq!(join_url(base, "/posts"), format!("{}/posts", base));
        assert_eq!(join_url(&format!("{}/", base), "/posts/1"), format!("{}/posts/1", base));
        assert_eq!(
            join_url(base, "posts/1/comments"),
            format!("{}/posts/1/comments", base)
        );
        assert_eq!(
            join_url(base, "comments?postId=1"),
            format!("{}/comments?postId=1", base)
        );
    }

    #[test]
    fn test_media_type_strips_parameters() {
        assert_eq!(media_type("application/json; charset=utf-8"), "application/json");
        assert_eq!(media_type("Text/HTML"), "text/html");
    }

    #[test]
    fn test_envelope_json() {
        let envelope = ResponseEnvelope {
            method: HttpMethod::Get,
            endpoint: "/posts/1".into(),
            status: 200,
            body: r#"{"id":1}"#.into(),
            content_type: Some("application/json".into()),
            success: true,
            error_message: None,
            elapsed_ms: 3,
        };
        let value: Value = envelope.json().unwrap();
        assert_eq!(value["id"], 1);
        assert!(envelope.has_body());
    }
}
