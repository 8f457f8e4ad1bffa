//! CSV Output
//!
//! One line per image row plus a trailing mean line when a summary
//! exists. Timings are printed with three decimals of a millisecond.

use crate::report::Report;
use std::fmt::Write as _;

/// Generate a CSV report.
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("image,local_ms,sandboxed_ms,remote_ms\n");

    for row in &report.rows {
        let _ = writeln!(
            out,
            "{},{:.3},{:.3},{:.3}",
            escape(&row.image),
            row.local_ms,
            row.sandboxed_ms,
            row.remote_ms
        );
    }

    if let Some(summary) = &report.summary {
        let _ = writeln!(
            out,
            "mean,{:.3},{:.3},{:.3}",
            summary.mean_local_ms, summary.mean_sandboxed_ms, summary.mean_remote_ms
        );
    }

    out
}

/// Quote a field if it contains CSV-significant characters.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
