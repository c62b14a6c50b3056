//! Test lifecycle coordinator
//!
//! Owns the run/case boundary for both tracks:
//!
//! ```text
//! RunContext::open ──► for each case ─────────────────────────────► RunContext::close
//!   (log + report)     │ report.begin(name)                           (flush report,
//!                      │ fixture.setup()                               close log)
//!                      │ case.run()        ── Ok / Assertion / Fault / panic
//!                      │ record pass|fail  (report + log)
//!                      │ fixture.on_failure()   (failed cases only)
//!                      │ fixture.teardown()     (always, once acquired)
//!                      └ report.seal()
//! ```
//!
//! Faults raised inside a case never escape the case boundary.

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RunConfig;
use crate::diagnostic::{DiagnosticSink, Level};
use crate::error::{Error, Result};
use crate::report::{EntryId, ReportSink};
use crate::types::{CaseStatus, Track};

/// Why a case did not pass
#[derive(Debug)]
pub enum CaseFailure {
    /// A check about the business outcome did not hold
    Assertion(String),
    /// Transport, UI-contract, or configuration fault
    Fault(Error),
    /// The case body panicked
    Panic(String),
}

impl std::fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseFailure::Assertion(msg) => write!(f, "{}", msg),
            CaseFailure::Fault(e) => write!(f, "{}", e),
            CaseFailure::Panic(msg) => write!(f, "panic: {}", msg),
        }
    }
}

impl From<Error> for CaseFailure {
    fn from(e: Error) -> Self {
        CaseFailure::Fault(e)
    }
}

/// Result of a case body
pub type CaseResult = std::result::Result<(), CaseFailure>;

/// Sinks for one run of one track
pub struct RunContext {
    run_id: String,
    track: Track,
    diagnostics: Arc<DiagnosticSink>,
    report: ReportSink,
    closed: Mutex<Option<PathBuf>>,
}

impl RunContext {
    /// Open the diagnostic log and the report for `track`.
    ///
    /// Fails when either sink cannot be created; no case may run then.
    pub fn open(track: Track, config: &RunConfig) -> Result<Self> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let diagnostics = DiagnosticSink::open(config.log_path(track), Level::Info)?;
        let report = ReportSink::open(track, &config.reports_dir(), run_id.clone())?;

        diagnostics.info(format!("Report and Logger initialized for {} run {}", track, run_id));

        Ok(Self {
            run_id,
            track,
            diagnostics: Arc::new(diagnostics),
            report,
            closed: Mutex::new(None),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// Shared handle for components that outlive a borrow of the context
    pub fn diagnostics_handle(&self) -> Arc<DiagnosticSink> {
        Arc::clone(&self.diagnostics)
    }

    pub fn report(&self) -> &ReportSink {
        &self.report
    }

    /// Flush the report and close the log. Safe to call more than once.
    ///
    /// The log is closed even when the flush fails; the flush error wins.
    pub fn close(&self) -> Result<PathBuf> {
        let mut closed = self.closed.lock();
        if let Some(path) = closed.as_ref() {
            return Ok(path.clone());
        }

        let flushed = self.report.flush();
        match &flushed {
            Ok(path) => self
                .diagnostics
                .info(format!("Report written to {}", path.display())),
            Err(e) => self.diagnostics.error("Failed to flush report", Some(e)),
        }
        let log_closed = self.diagnostics.close();
        let path = flushed?;
        log_closed?;

        *closed = Some(path.clone());
        Ok(path)
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        if self.closed.lock().is_none() {
            if let Err(e) = self.close() {
                tracing::error!("Failed to close run {}: {}", self.run_id, e);
            }
        }
    }
}

/// Per-case view of the run's sinks
pub struct CaseContext<'a> {
    run: &'a RunContext,
    entry: EntryId,
    name: &'a str,
}

impl<'a> CaseContext<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        self.run.diagnostics()
    }

    pub fn run(&self) -> &RunContext {
        self.run
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.run.diagnostics().info(message);
    }

    pub fn report(&self, message: impl Into<String>) {
        self.run.report().info(self.entry, message);
    }

    pub fn log_and_report(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.log(message);
        self.report(message);
    }
}

/// One executable case
#[async_trait]
pub trait TestCase<R: Send>: Send + Sync {
    /// Display name used for the report entry and snapshot file
    fn name(&self) -> String;

    fn description(&self) -> Option<&str> {
        None
    }

    async fn run(&self, resource: &mut R, ctx: &CaseContext<'_>) -> CaseResult;
}

/// Per-case resource acquisition and release for a track
#[async_trait]
pub trait CaseFixture: Send {
    type Resource: Send;

    async fn setup(&mut self, ctx: &CaseContext<'_>) -> Result<Self::Resource>;

    /// Called before teardown when the case failed
    async fn on_failure(&mut self, _resource: &mut Self::Resource, _ctx: &CaseContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Always called once `setup` succeeded
    async fn teardown(&mut self, resource: Self::Resource, ctx: &CaseContext<'_>) -> Result<()>;
}

pub type CaseList<R> = Vec<Box<dyn TestCase<R>>>;

/// Outcome of one executed case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub name: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    pub detail: Option<String>,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub track: Track,
    pub run_id: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub records: Vec<CaseRecord>,
    pub report_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Drives a list of cases through the lifecycle against one run context
pub struct Coordinator<'a> {
    run: &'a RunContext,
}

impl<'a> Coordinator<'a> {
    pub fn new(run: &'a RunContext) -> Self {
        Self { run }
    }

    /// Open sinks, build the fixture and cases, run them all, close sinks.
    ///
    /// Only sink initialization and setup faults end the run early; sinks
    /// are flushed and closed on every path once opened.
    pub async fn run_track<F, B>(track: Track, config: &RunConfig, build: B) -> Result<RunSummary>
    where
        F: CaseFixture,
        B: FnOnce(&RunContext) -> Result<(F, CaseList<F::Resource>)>,
    {
        let run = RunContext::open(track, config)?;

        let (mut fixture, cases) = match build(&run) {
            Ok(built) => built,
            Err(e) => {
                run.diagnostics().error("Run setup failed", Some(&e));
                run.close()?;
                return Err(e);
            }
        };

        let summary = Coordinator::new(&run).run(&mut fixture, &cases).await;
        drop(fixture);

        finish(&run, summary)
    }

    /// Run every case in order. One case's fault never stops the next.
    pub async fn run<F: CaseFixture>(&self, fixture: &mut F, cases: &[Box<dyn TestCase<F::Resource>>]) -> RunSummary {
        let start = Instant::now();
        let mut records = Vec::with_capacity(cases.len());

        self.run
            .diagnostics()
            .info(format!("Running {} {} case(s)", cases.len(), self.run.track()));

        for case in cases {
            let record = self.run_case(fixture, case.as_ref()).await;
            records.push(record);
        }

        let passed = records.iter().filter(|r| r.status == CaseStatus::Pass).count();
        let failed = records.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.run.diagnostics().info(format!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        ));

        RunSummary {
            track: self.run.track(),
            run_id: self.run.run_id().to_string(),
            total: records.len(),
            passed,
            failed,
            duration_ms,
            records,
            report_path: None,
            log_path: None,
        }
    }

    /// Run one case through setup, body, failure hook and teardown
    pub async fn run_case<F: CaseFixture>(&self, fixture: &mut F, case: &dyn TestCase<F::Resource>) -> CaseRecord {
        let start = Instant::now();
        let name = case.name();
        let entry = self.run.report().begin(name.clone());
        let ctx = CaseContext {
            run: self.run,
            entry,
            name: &name,
        };

        ctx.log(format!("Starting test: {}", name));
        if let Some(description) = case.description() {
            ctx.report(description);
        }

        let mut setup_failure = None;
        let mut resource = match fixture.setup(&ctx).await {
            Ok(resource) => Some(resource),
            Err(e) => {
                ctx.diagnostics().error(format!("Setup failed for {}", name), Some(&e));
                setup_failure = Some(CaseFailure::Fault(e));
                None
            }
        };

        let failure = match resource.as_mut() {
            Some(res) => {
                let outcome = AssertUnwindSafe(case.run(res, &ctx)).catch_unwind().await;
                match outcome {
                    Ok(Ok(())) => None,
                    Ok(Err(failure)) => Some(failure),
                    Err(payload) => Some(CaseFailure::Panic(panic_message(payload.as_ref()))),
                }
            }
            None => setup_failure,
        };

        ctx.log("TearDown after test execution.");

        let status = match &failure {
            None => {
                self.run.report().pass(entry, "Test passed");
                ctx.log("Test passed.");
                CaseStatus::Pass
            }
            Some(failure) => {
                self.record_failure(&ctx, failure);
                CaseStatus::Fail
            }
        };

        if let Some(mut res) = resource.take() {
            if status == CaseStatus::Fail {
                if let Err(e) = fixture.on_failure(&mut res, &ctx).await {
                    self.record_teardown_error(&ctx, &e);
                }
            }
            if let Err(e) = fixture.teardown(res, &ctx).await {
                self.record_teardown_error(&ctx, &e);
            }
        }

        let detail = failure.map(|f| f.to_string());
        let status = self.run.report().seal(entry, status);
        ctx.log(format!("Test {} ended with status: {}", name, status));

        CaseRecord {
            name,
            status,
            duration_ms: start.elapsed().as_millis() as u64,
            detail,
        }
    }

    fn record_failure(&self, ctx: &CaseContext<'_>, failure: &CaseFailure) {
        let message = format!("Test failed: {}", failure);
        self.run.report().fail(ctx.entry, message.clone());
        match failure {
            CaseFailure::Fault(e) => ctx.diagnostics().error(message, Some(e)),
            _ => ctx.diagnostics().error(message, None),
        }
    }

    fn record_teardown_error(&self, ctx: &CaseContext<'_>, e: &Error) {
        let message = format!("Error during TearDown: {}", e);
        ctx.diagnostics().error(&message, Some(e));
        self.run.report().info(ctx.entry, message);
    }
}

/// Attach artifact paths and close the run. The log path is read last so a
/// day roll during the run is reflected.
fn finish(run: &RunContext, mut summary: RunSummary) -> Result<RunSummary> {
    summary.log_path = run.diagnostics().current_path();
    summary.report_path = Some(run.close()?);
    Ok(summary)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    #[test]
    fn test_finish_reads_log_path_after_day_roll() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig {
            artifacts_dir: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let run = RunContext::open(Track::Api, &config).unwrap();

        let later = Local.with_ymd_and_hms(2031, 1, 2, 9, 0, 0).unwrap();
        run.diagnostics().record(later, Level::Info, "next day", None);

        let summary = RunSummary {
            track: Track::Api,
            run_id: run.run_id().to_string(),
            total: 0,
            passed: 0,
            failed: 0,
            duration_ms: 0,
            records: Vec::new(),
            report_path: None,
            log_path: None,
        };
        let summary = finish(&run, summary).unwrap();

        let log_path = summary.log_path.unwrap();
        assert!(log_path.to_string_lossy().ends_with("20310102.txt"));
        assert!(std::fs::read_to_string(log_path).unwrap().contains("next day"));
        assert!(summary.report_path.unwrap().exists());
        assert!(run.diagnostics().is_closed());
    }
}
