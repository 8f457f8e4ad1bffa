//! Batch Benchmark Runner
//!
//! Strictly sequential: images in corpus order, backends in
//! Local → Sandboxed → Remote order within each image, so measurement
//! windows never interleave. Failures are isolated per image: a decode
//! or backend failure is logged with enough context to diagnose and the
//! image is excluded from the rows — no partial rows, and the rest of
//! the corpus always runs.

use crate::backend::Backend;
use crate::corpus::CorpusImage;
use indicatif::{ProgressBar, ProgressStyle};
use shadebench_core::{RasterImage, Timer};
use shadebench_report::ImageBenchmarkRow;

/// Run all three backends over every corpus image, in order.
///
/// Each backend starts from a fresh clone of the decoded buffer — the
/// Local backend mutates in place, so a buffer is never reused across
/// backends. Returns one row per image that completed all three.
pub fn run_batch(
    corpus: &[CorpusImage],
    local: &mut dyn Backend,
    sandboxed: &mut dyn Backend,
    remote: &mut dyn Backend,
) -> Vec<ImageBenchmarkRow> {
    let pb = ProgressBar::new(corpus.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut rows = Vec::new();

    for entry in corpus {
        pb.set_message(entry.name.clone());

        let decoded = match RasterImage::decode(&entry.bytes) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(image = %entry.name, error = %e, "skipping undecodable corpus image");
                pb.inc(1);
                continue;
            }
        };

        if let Some(row) = run_image(entry, &decoded, local, sandboxed, remote) {
            rows.push(row);
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    rows
}

/// Measure one image across all backends; `None` if any backend failed.
fn run_image(
    entry: &CorpusImage,
    decoded: &RasterImage,
    local: &mut dyn Backend,
    sandboxed: &mut dyn Backend,
    remote: &mut dyn Backend,
) -> Option<ImageBenchmarkRow> {
    // Fixed measurement order; the row columns are positional.
    let backends: [&mut dyn Backend; 3] = [local, sandboxed, remote];
    let mut timings = [0.0f64; 3];

    for (slot, backend) in backends.into_iter().enumerate() {
        // Copy outside the timing window: the measurement covers the
        // transform call, not the buffer duplication.
        let input = decoded.clone();
        let timer = Timer::start();
        match backend.transform(input) {
            Ok(_) => timings[slot] = timer.elapsed_ms(),
            Err(e) => {
                tracing::warn!(
                    image = %entry.name,
                    backend = %backend.id(),
                    error = %e,
                    "backend failed; excluding image from results"
                );
                return None;
            }
        }
    }

    Some(ImageBenchmarkRow {
        image: entry.name.clone(),
        local_ms: timings[0],
        sandboxed_ms: timings[1],
        remote_ms: timings[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use shadebench_core::{BackendId, grayscale_in_place};

    /// Applies the kernel like a well-behaved backend, recording the
    /// input pixels it was handed.
    struct RecordingBackend {
        id: BackendId,
        seen: Vec<Vec<u8>>,
    }

    impl RecordingBackend {
        fn new(id: BackendId) -> Self {
            Self {
                id,
                seen: Vec::new(),
            }
        }
    }

    impl Backend for RecordingBackend {
        fn id(&self) -> BackendId {
            self.id
        }
        fn transform(&mut self, mut image: RasterImage) -> Result<RasterImage, BackendError> {
            self.seen.push(image.pixels().to_vec());
            grayscale_in_place(image.pixels_mut());
            Ok(image)
        }
    }

    /// Fails every image whose first pixel is fully black.
    struct FailOnBlackBackend(BackendId);

    impl Backend for FailOnBlackBackend {
        fn id(&self) -> BackendId {
            self.0
        }
        fn transform(&mut self, mut image: RasterImage) -> Result<RasterImage, BackendError> {
            if image.pixels()[..3] == [0, 0, 0] {
                return Err(BackendError::Remote { status: 500 });
            }
            grayscale_in_place(image.pixels_mut());
            Ok(image)
        }
    }

    fn corpus_entry(name: &str, first_pixel: [u8; 4]) -> CorpusImage {
        let mut pixels = first_pixel.to_vec();
        pixels.extend_from_slice(&[10, 20, 30, 255]);
        let image = RasterImage::new(2, 1, pixels);
        CorpusImage {
            name: name.to_string(),
            bytes: image.encode_png(),
        }
    }

    #[test]
    fn test_one_row_per_completed_image() {
        let corpus = vec![
            corpus_entry("a.png", [50, 60, 70, 255]),
            corpus_entry("b.png", [80, 90, 100, 255]),
        ];

        let rows = run_batch(
            &corpus,
            &mut RecordingBackend::new(BackendId::Local),
            &mut RecordingBackend::new(BackendId::Sandboxed),
            &mut RecordingBackend::new(BackendId::Remote),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].image, "a.png");
        assert_eq!(rows[1].image, "b.png");
        for row in &rows {
            assert!(row.local_ms >= 0.0);
            assert!(row.sandboxed_ms >= 0.0);
            assert!(row.remote_ms >= 0.0);
        }
    }

    #[test]
    fn test_decode_failure_skips_only_that_image() {
        let corpus = vec![
            corpus_entry("a.png", [50, 60, 70, 255]),
            CorpusImage {
                name: "broken.png".to_string(),
                bytes: b"not an image".to_vec(),
            },
            corpus_entry("c.png", [80, 90, 100, 255]),
        ];

        let rows = run_batch(
            &corpus,
            &mut RecordingBackend::new(BackendId::Local),
            &mut RecordingBackend::new(BackendId::Sandboxed),
            &mut RecordingBackend::new(BackendId::Remote),
        );

        // Row count equals corpus size minus failed images.
        let names: Vec<&str> = rows.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_backend_failure_excludes_image_without_partial_row() {
        let corpus = vec![
            corpus_entry("good.png", [50, 60, 70, 255]),
            corpus_entry("poisoned.png", [0, 0, 0, 255]),
            corpus_entry("also-good.png", [80, 90, 100, 255]),
        ];

        let rows = run_batch(
            &corpus,
            &mut RecordingBackend::new(BackendId::Local),
            &mut RecordingBackend::new(BackendId::Sandboxed),
            &mut FailOnBlackBackend(BackendId::Remote),
        );

        let names: Vec<&str> = rows.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(names, vec!["good.png", "also-good.png"]);
    }

    #[test]
    fn test_backends_receive_independent_copies() {
        // The local backend mutates its buffer in place; if buffers were
        // shared, the later backends would see grayscaled input instead
        // of the original pixels.
        let corpus = vec![corpus_entry("a.png", [90, 30, 60, 255])];
        let original = RasterImage::decode(&corpus[0].bytes).unwrap().pixels().to_vec();

        let mut local = RecordingBackend::new(BackendId::Local);
        let mut sandboxed = RecordingBackend::new(BackendId::Sandboxed);
        let mut remote = RecordingBackend::new(BackendId::Remote);

        let rows = run_batch(&corpus, &mut local, &mut sandboxed, &mut remote);
        assert_eq!(rows.len(), 1);

        assert_eq!(local.seen[0], original);
        assert_eq!(sandboxed.seen[0], original);
        assert_eq!(remote.seen[0], original);
    }
}
