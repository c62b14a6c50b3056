//! Reporting sink - one entry per executed case, flushed once per run

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{CaseStatus, Track};

/// Severity of a single report message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Info,
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMessage {
    pub at: DateTime<Local>,
    pub level: MessageLevel,
    pub text: String,
}

/// Report entry for one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub started_at: DateTime<Local>,
    pub messages: Vec<ReportMessage>,
    /// Set when the entry is sealed
    pub status: Option<CaseStatus>,
}

impl ReportEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            started_at: Local::now(),
            messages: Vec::new(),
            status: None,
        }
    }

    /// Fail if any fail message was appended, pass otherwise
    pub fn derived_status(&self) -> CaseStatus {
        if self.messages.iter().any(|m| m.level == MessageLevel::Fail) {
            CaseStatus::Fail
        } else {
            CaseStatus::Pass
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.status.is_some()
    }
}

/// Handle to an entry created by [`ReportSink::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(usize);

/// Serialized form of a flushed report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub track: Track,
    pub run_id: String,
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub entries: Vec<ReportEntry>,
}

#[derive(Default)]
struct ReportState {
    entries: Vec<ReportEntry>,
    current: Option<usize>,
}

/// Accumulates report entries for one track
pub struct ReportSink {
    track: Track,
    run_id: String,
    dir: PathBuf,
    state: Mutex<ReportState>,
}

impl ReportSink {
    /// Create the track's report directory and an empty report
    pub fn open(track: Track, reports_dir: &Path, run_id: impl Into<String>) -> Result<Self> {
        let dir = reports_dir.join(track.as_str());
        std::fs::create_dir_all(&dir).map_err(|e| Error::SinkInit {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            track,
            run_id: run_id.into(),
            dir,
            state: Mutex::new(ReportState::default()),
        })
    }

    pub fn track(&self) -> Track {
        self.track
    }

    /// Start a new entry and make it the current one
    pub fn begin(&self, name: impl Into<String>) -> EntryId {
        let mut state = self.state.lock();
        state.entries.push(ReportEntry::new(name.into()));
        let idx = state.entries.len() - 1;
        state.current = Some(idx);
        EntryId(idx)
    }

    /// Entry most recently started, if any
    pub fn current(&self) -> Option<EntryId> {
        self.state.lock().current.map(EntryId)
    }

    pub fn info(&self, entry: EntryId, text: impl Into<String>) {
        self.append(entry, MessageLevel::Info, text.into());
    }

    pub fn pass(&self, entry: EntryId, text: impl Into<String>) {
        self.append(entry, MessageLevel::Pass, text.into());
    }

    pub fn fail(&self, entry: EntryId, text: impl Into<String>) {
        self.append(entry, MessageLevel::Fail, text.into());
    }

    /// Fix the entry's terminal status. Sealing twice keeps the first status.
    pub fn seal(&self, entry: EntryId, status: CaseStatus) -> CaseStatus {
        let mut state = self.state.lock();
        let Some(e) = state.entries.get_mut(entry.0) else {
            return CaseStatus::Fail;
        };
        if let Some(sealed) = e.status {
            return sealed;
        }
        e.status = Some(status);
        status
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.state.lock().entries.clone()
    }

    pub fn html_path(&self) -> PathBuf {
        self.dir.join(format!("{}_Report.html", self.track))
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(format!("{}_Report.json", self.track))
    }

    /// Write the HTML and JSON artifacts. Unsealed entries are sealed from their messages.
    pub fn flush(&self) -> Result<PathBuf> {
        let entries = {
            let mut state = self.state.lock();
            for entry in state.entries.iter_mut().filter(|e| !e.is_sealed()) {
                entry.status = Some(entry.derived_status());
            }
            state.entries.clone()
        };

        let document = ReportDocument {
            track: self.track,
            run_id: self.run_id.clone(),
            title: format!("{} Automation Test Report", self.track),
            generated_at: Local::now(),
            entries,
        };

        std::fs::write(self.json_path(), serde_json::to_string_pretty(&document)?)?;

        let html_path = self.html_path();
        std::fs::write(&html_path, render_html(&document))?;
        Ok(html_path)
    }

    fn append(&self, entry: EntryId, level: MessageLevel, text: String) {
        let mut state = self.state.lock();
        match state.entries.get_mut(entry.0) {
            Some(e) if !e.is_sealed() => e.messages.push(ReportMessage {
                at: Local::now(),
                level,
                text,
            }),
            Some(e) => tracing::debug!("Ignoring message for sealed entry '{}'", e.name),
            None => tracing::warn!("Unknown report entry {:?}", entry),
        }
    }
}

fn render_html(doc: &ReportDocument) -> String {
    let passed = doc
        .entries
        .iter()
        .filter(|e| e.status == Some(CaseStatus::Pass))
        .count();
    let failed = doc.entries.len() - passed;

    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
section {{ border: 1px solid #ccc; border-radius: 4px; margin: 1em 0; padding: 0.5em 1em; }}
.pass {{ color: #2e7d32; }}
.fail {{ color: #c62828; }}
.info {{ color: #555; }}
td {{ padding: 2px 8px; vertical-align: top; }}
</style>
</head>
<body>
<h1>{track} Test Execution Report</h1>
<p>Run {run_id} generated {generated}: {total} case(s), {passed} passed, {failed} failed</p>
"#,
        title = escape(&doc.title),
        track = doc.track,
        run_id = escape(&doc.run_id),
        generated = doc.generated_at.format("%Y-%m-%d %H:%M:%S"),
        total = doc.entries.len(),
        passed = passed,
        failed = failed,
    ));

    for entry in &doc.entries {
        let status = entry.status.unwrap_or_else(|| entry.derived_status());
        html.push_str(&format!(
            "<section>\n<h2 class=\"{status}\">{name} - {status}</h2>\n<table>\n",
            status = status,
            name = escape(&entry.name),
        ));
        for message in &entry.messages {
            let class = match message.level {
                MessageLevel::Info => "info",
                MessageLevel::Pass => "pass",
                MessageLevel::Fail => "fail",
            };
            html.push_str(&format!(
                "<tr class=\"{class}\"><td>{at}</td><td>{class}</td><td><pre>{text}</pre></td></tr>\n",
                class = class,
                at = message.at.format("%H:%M:%S%.3f"),
                text = escape(&message.text),
            ));
        }
        html.push_str("</table>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
