//! checkrun API track
//!
//! Transport adapter, post service, built-in case sets and the API suite.

pub mod cases;
pub mod models;
pub mod service;
pub mod suite;
pub mod transport;

pub use cases::{CaseLoader, CaseTuple, CaseValue};
pub use models::{Comment, Post, PostUpdate};
pub use service::PostService;
pub use suite::{api_suite, run_api, run_api_with, ApiFixture};
pub use transport::{HttpMethod, HttpTransport, ResponseEnvelope, Transport};
