//! checkrun Common Library
//!
//! Run lifecycle, sinks and configuration shared by the API and UI tracks.

pub mod check;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lifecycle;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{RunConfig, UiConfig};
pub use diagnostic::{DiagnosticSink, Level};
pub use error::{Error, ErrorKind, Result};
pub use lifecycle::{
    CaseContext, CaseFailure, CaseFixture, CaseList, CaseRecord, CaseResult, Coordinator,
    RunContext, RunSummary, TestCase,
};
pub use report::{EntryId, ReportEntry, ReportSink};
pub use types::*;

/// checkrun version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
