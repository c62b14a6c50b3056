//! Core types for checkrun

use serde::{Deserialize, Serialize};

/// Which harness track a run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Track {
    Api,
    Ui,
}

impl Track {
    /// Identifier used for report directories and titles
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Api => "API",
            Track::Ui => "UI",
        }
    }

    pub fn log_file_name(&self) -> &'static str {
        match self {
            Track::Api => "api-test-logs.txt",
            Track::Ui => "ui-test-logs.txt",
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of an executed case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Pass => write!(f, "pass"),
            CaseStatus::Fail => write!(f, "fail"),
        }
    }
}
