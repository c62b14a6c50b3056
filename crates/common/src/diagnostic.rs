//! Diagnostic sink - append-only, day-rolling run log
//!
//! Engineer-facing log for a single run. Every record is written as one
//! timestamped line to a file whose name carries the calendar day and is
//! mirrored to `tracing` so the console shows the same stream.

use chrono::{DateTime, Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Severity of a diagnostic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
        }
    }
}

struct DayFile {
    day: NaiveDate,
    path: PathBuf,
    file: File,
}

/// Process-wide structured log for one run
pub struct DiagnosticSink {
    base_path: PathBuf,
    min_level: Level,
    current: Mutex<Option<DayFile>>,
}

impl DiagnosticSink {
    /// Open the log at `base_path`, creating parent directories.
    ///
    /// The actual file is `<stem><yyyyMMdd>.<ext>` next to `base_path`.
    pub fn open(base_path: impl Into<PathBuf>, min_level: Level) -> Result<Self> {
        let base_path = base_path.into();
        let today = Local::now().date_naive();
        let day_file = open_day_file(&base_path, today)?;

        Ok(Self {
            base_path,
            min_level,
            current: Mutex::new(Some(day_file)),
        })
    }

    /// Path of the file currently being appended to
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current.lock().as_ref().map(|f| f.path.clone())
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.record(Local::now(), Level::Debug, message.as_ref(), None);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.record(Local::now(), Level::Info, message.as_ref(), None);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(Local::now(), Level::Warn, message.as_ref(), None);
    }

    /// Error record, with the fault's source chain appended when given
    pub fn error(&self, message: impl AsRef<str>, fault: Option<&(dyn std::error::Error + 'static)>) {
        self.record(Local::now(), Level::Error, message.as_ref(), fault);
    }

    /// Flush and release the file handle. Later records only reach the console.
    pub fn close(&self) -> Result<()> {
        if let Some(mut day_file) = self.current.lock().take() {
            day_file.file.flush()?;
            day_file.file.sync_all()?;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.current.lock().is_none()
    }

    pub(crate) fn record(
        &self,
        now: DateTime<Local>,
        level: Level,
        message: &str,
        fault: Option<&(dyn std::error::Error + 'static)>,
    ) {
        let detail = fault.map(fault_chain);

        match (level, &detail) {
            (Level::Debug, _) => tracing::debug!("{}", message),
            (Level::Info, _) => tracing::info!("{}", message),
            (Level::Warn, _) => tracing::warn!("{}", message),
            (Level::Error, Some(detail)) => tracing::error!("{} | {}", message, detail),
            (Level::Error, None) => tracing::error!("{}", message),
        }

        if level < self.min_level {
            return;
        }

        let mut line = format!(
            "{} [{}] {}\n",
            now.format("%Y-%m-%d %H:%M:%S%.3f %:z"),
            level.tag(),
            message
        );
        if let Some(detail) = detail {
            line.push_str(&detail);
            line.push('\n');
        }

        let mut guard = self.current.lock();
        let Some(day_file) = guard.as_mut() else {
            return;
        };

        let day = now.date_naive();
        if day != day_file.day {
            match open_day_file(&self.base_path, day) {
                Ok(next) => *day_file = next,
                Err(e) => tracing::warn!("Failed to roll diagnostic log: {}", e),
            }
        }

        if let Err(e) = day_file.file.write_all(line.as_bytes()) {
            tracing::warn!("Failed to write diagnostic log {}: {}", day_file.path.display(), e);
        }
    }
}

impl Drop for DiagnosticSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// `dir/api-test-logs.txt` on 2026-10-19 becomes `dir/api-test-logs20261019.txt`
pub fn day_path(base_path: &Path, day: NaiveDate) -> PathBuf {
    let stem = base_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "log".to_string());
    let name = match base_path.extension() {
        Some(ext) => format!("{}{}.{}", stem, day.format("%Y%m%d"), ext.to_string_lossy()),
        None => format!("{}{}", stem, day.format("%Y%m%d")),
    };
    base_path.with_file_name(name)
}

fn open_day_file(base_path: &Path, day: NaiveDate) -> Result<DayFile> {
    let path = day_path(base_path, day);
    let sink_err = |e: std::io::Error| Error::SinkInit {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(sink_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(sink_err)?;

    Ok(DayFile { day, path, file })
}

fn fault_chain(fault: &(dyn std::error::Error + 'static)) -> String {
    let mut out = format!("  fault: {}", fault);
    let mut source = fault.source();
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {}", cause));
        source = cause.source();
    }
    out
}
