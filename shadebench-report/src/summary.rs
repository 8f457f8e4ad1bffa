//! Summary Aggregation
//!
//! Reduces the row table to per-backend arithmetic means. The empty-rows
//! case is an explicit "no data" state, not a NaN: the presentation
//! layer checks for `None` instead of printing garbage.

use crate::report::{BenchmarkSummary, ImageBenchmarkRow};

/// Reduce rows to per-backend means. Pure function over a snapshot.
pub fn aggregate(rows: &[ImageBenchmarkRow]) -> Option<BenchmarkSummary> {
    if rows.is_empty() {
        return None;
    }

    let n = rows.len() as f64;
    Some(BenchmarkSummary {
        mean_local_ms: rows.iter().map(|r| r.local_ms).sum::<f64>() / n,
        mean_sandboxed_ms: rows.iter().map(|r| r.sandboxed_ms).sum::<f64>() / n,
        mean_remote_ms: rows.iter().map(|r| r.remote_ms).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(image: &str, local: f64, sandboxed: f64, remote: f64) -> ImageBenchmarkRow {
        ImageBenchmarkRow {
            image: image.to_string(),
            local_ms: local,
            sandboxed_ms: sandboxed,
            remote_ms: remote,
        }
    }

    #[test]
    fn test_empty_rows_is_no_data() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn test_constant_rows_aggregate_to_the_constant() {
        let rows = vec![
            row("a.png", 3.5, 3.5, 3.5),
            row("b.png", 3.5, 3.5, 3.5),
            row("c.png", 3.5, 3.5, 3.5),
        ];
        let summary = aggregate(&rows).unwrap();
        assert_eq!(summary.mean_local_ms, 3.5);
        assert_eq!(summary.mean_sandboxed_ms, 3.5);
        assert_eq!(summary.mean_remote_ms, 3.5);
    }

    #[test]
    fn test_means_are_per_column() {
        let rows = vec![row("a.png", 1.0, 10.0, 100.0), row("b.png", 3.0, 30.0, 300.0)];
        let summary = aggregate(&rows).unwrap();
        assert_eq!(summary.mean_local_ms, 2.0);
        assert_eq!(summary.mean_sandboxed_ms, 20.0);
        assert_eq!(summary.mean_remote_ms, 200.0);
    }

    #[test]
    fn test_never_nan() {
        let summary = aggregate(&[row("a.png", 0.0, 0.0, 0.0)]).unwrap();
        assert!(!summary.mean_local_ms.is_nan());
        assert!(!summary.mean_sandboxed_ms.is_nan());
        assert!(!summary.mean_remote_ms.is_nan());
    }
}
