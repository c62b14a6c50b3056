//! Error types for checkrun

use thiserror::Error;

/// Result type alias using checkrun Error
pub type Result<T> = std::result::Result<T, Error>;

/// checkrun error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Sink initialization failed for {path}: {reason}")]
    SinkInit { path: String, reason: String },

    #[error("Transport error on {method} {endpoint}: {message}")]
    Transport {
        method: String,
        endpoint: String,
        message: String,
    },

    #[error("No base endpoint configured for the API track")]
    MissingBaseUrl,

    #[error("Path '{page}:{key}' not found in configuration")]
    MissingLocator { page: String, key: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Browser driver error: {0}")]
    Driver(String),

    #[error("Case parameter {index} missing or not a {expected}")]
    CaseArity { index: usize, expected: &'static str },

    #[error("Operation timeout after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fault classes a case boundary distinguishes when recording an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, DNS, or connection timeout talking to the remote system
    Transport,
    /// Page structure no longer matches the locator contract
    UiContract,
    /// Log or report could not be opened
    SinkInit,
    /// Missing base endpoint, missing locator key, bad config file
    Configuration,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } | Error::Timeout { .. } => ErrorKind::Transport,
            Error::ElementNotFound { .. } | Error::Driver(_) => ErrorKind::UiContract,
            Error::SinkInit { .. } => ErrorKind::SinkInit,
            Error::Config(_) | Error::MissingBaseUrl | Error::MissingLocator { .. } => {
                ErrorKind::Configuration
            }
            Error::Io(_) | Error::Serialization(_) | Error::CaseArity { .. } | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
