//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use checkrun_common::{CaseRecord, CaseStatus, RunSummary};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// Render a value as JSON or YAML
pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        _ => serde_json::to_string_pretty(value)?,
    })
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table if items.is_empty() => println!("No items found."),
        OutputFormat::Table => println!("{}", table(items)),
        _ => println!("{}", render(items, format)?),
    }
    Ok(())
}

impl TableDisplay for CaseRecord {
    fn headers() -> Vec<&'static str> {
        vec!["Case", "Status", "Duration", "Detail"]
    }

    fn row(&self) -> Vec<String> {
        let status = match self.status {
            CaseStatus::Pass => "✓ pass".green().to_string(),
            CaseStatus::Fail => "✗ fail".red().to_string(),
        };
        vec![
            self.name.clone(),
            status,
            format!("{} ms", self.duration_ms),
            self.detail.as_deref().map(first_line).unwrap_or_default(),
        ]
    }
}

/// Print per-case outcomes and run totals
pub fn print_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    if !matches!(format, OutputFormat::Table) {
        println!("{}", render(summary, format)?);
        return Ok(());
    }

    if !summary.records.is_empty() {
        println!("{}", table(&summary.records));
    }

    let totals = format!(
        "{} {} case(s): {} passed, {} failed ({} ms)",
        summary.track, summary.total, summary.passed, summary.failed, summary.duration_ms
    );
    if summary.success() {
        print_success(&totals);
    } else {
        print_error(&totals);
    }
    if let Some(path) = &summary.report_path {
        println!("  Report: {}", path.display());
    }
    if let Some(path) = &summary.log_path {
        println!("  Log:    {}", path.display());
    }
    Ok(())
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
