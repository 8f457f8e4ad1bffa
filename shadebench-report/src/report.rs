//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete report for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata.
    pub meta: ReportMeta,
    /// One row per corpus image that completed all three backends.
    /// Images where any backend failed are logged and excluded, so the
    /// per-backend means stay comparable.
    pub rows: Vec<ImageBenchmarkRow>,
    /// Per-backend means, or `None` when no image completed all
    /// backends ("no data" — never NaN).
    pub summary: Option<BenchmarkSummary>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version.
    pub schema_version: u32,
    /// Shadebench version that produced the report.
    pub version: String,
    /// UTC time the report was generated.
    pub timestamp: DateTime<Utc>,
    /// Number of images in the corpus (rows can be fewer: failed images
    /// are excluded).
    pub corpus_size: usize,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub total_duration_ms: f64,
    /// Host details for cross-run comparison.
    pub system: SystemInfo,
}

/// System information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name.
    pub os: String,
    /// CPU model string.
    pub cpu: String,
    /// Logical CPU count.
    pub cpu_cores: u32,
}

/// One corpus image's timing triple across all backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBenchmarkRow {
    /// Corpus image name.
    pub image: String,
    /// Local backend wall-clock milliseconds.
    pub local_ms: f64,
    /// Sandboxed backend wall-clock milliseconds.
    pub sandboxed_ms: f64,
    /// Remote backend wall-clock milliseconds.
    pub remote_ms: f64,
}

/// Per-backend mean latencies.
///
/// Always derived from the current rows via [`crate::aggregate`], never
/// stored independently, so it cannot drift from its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    /// Mean local-backend milliseconds.
    pub mean_local_ms: f64,
    /// Mean sandboxed-backend milliseconds.
    pub mean_sandboxed_ms: f64,
    /// Mean remote-backend milliseconds.
    pub mean_remote_ms: f64,
}
