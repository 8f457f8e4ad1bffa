//! Report Metadata Collection
//!
//! Captures version, timestamp and host details so timings from
//! different machines are never compared blind. Linux-specific data
//! (CPU model) gracefully degrades to "Unknown" elsewhere.

use chrono::Utc;
use shadebench_report::{ReportMeta, SystemInfo};

/// Build report metadata for one batch run.
pub fn build_report_meta(corpus_size: usize, total_duration_ms: f64) -> ReportMeta {
    ReportMeta {
        schema_version: 1,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        corpus_size,
        total_duration_ms,
        system: SystemInfo {
            os: std::env::consts::OS.to_string(),
            cpu: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: num_cpus(),
        },
    }
}

/// Get the CPU model name from /proc/cpuinfo (Linux only).
fn cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
