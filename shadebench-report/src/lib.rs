#![warn(missing_docs)]
//! Shadebench Report - Results and Output
//!
//! Holds the per-image result rows, reduces them to per-backend means,
//! and renders machine-readable output:
//! - JSON (full report)
//! - CSV (spreadsheet-compatible)
//!
//! The human-readable terminal format lives with the CLI, next to the
//! code that knows the run context.

mod csv;
mod json;
mod report;
mod summary;

pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use report::{BenchmarkSummary, ImageBenchmarkRow, Report, ReportMeta, SystemInfo};
pub use summary::aggregate;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with the full report schema.
    Json,
    /// CSV rows for spreadsheets.
    Csv,
    /// Human-readable terminal output.
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
