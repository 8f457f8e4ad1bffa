//! Output Formatting
//!
//! Human-readable terminal output: a per-image timing table plus the
//! per-backend means, with an explicit "no data" rendering when no image
//! completed all backends.

use shadebench_report::Report;

/// Format a report for human-readable terminal display.
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Shadebench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if report.rows.is_empty() {
        output.push_str("  no data: no corpus image completed all three backends\n");
    } else {
        let name_width = report
            .rows
            .iter()
            .map(|r| r.image.len())
            .max()
            .unwrap_or(5)
            .max("image".len());

        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>12}  {:>12}\n",
            "image",
            "local ms",
            "sandboxed ms",
            "remote ms",
            width = name_width
        ));
        output.push_str(&format!("  {}\n", "-".repeat(name_width + 44)));

        for row in &report.rows {
            output.push_str(&format!(
                "  {:<width$}  {:>12.2}  {:>12.2}  {:>12.2}\n",
                row.image,
                row.local_ms,
                row.sandboxed_ms,
                row.remote_ms,
                width = name_width
            ));
        }
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');

    match &report.summary {
        Some(summary) => {
            output.push_str(&format!(
                "  mean local:     {:>10.2} ms\n",
                summary.mean_local_ms
            ));
            output.push_str(&format!(
                "  mean sandboxed: {:>10.2} ms\n",
                summary.mean_sandboxed_ms
            ));
            output.push_str(&format!(
                "  mean remote:    {:>10.2} ms\n",
                summary.mean_remote_ms
            ));
        }
        None => output.push_str("  no data\n"),
    }

    output.push_str(&format!(
        "  images: {} of {} corpus entries\n",
        report.rows.len(),
        report.meta.corpus_size
    ));
    output.push_str(&format!(
        "  duration: {:.2} ms\n",
        report.meta.total_duration_ms
    ));

    output
}
