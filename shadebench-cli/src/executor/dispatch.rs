//! Single-Image Dispatch
//!
//! Orchestrates one manual run: extract the pixel buffer from the
//! source, invoke the chosen backend inside a timing window, write the
//! result back to the presentation surface (an output PNG). Extraction
//! and decode failures stay distinct from backend failures so the status
//! channel can tell "your source is unreadable" apart from "the backend
//! broke".

use crate::backend::{Backend, BackendError};
use shadebench_core::{BackendId, RasterError, RasterImage, Timer};
use std::path::Path;
use thiserror::Error;

/// Failures of one dispatch, in the order the steps can fail.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The pixel source could not be read at all.
    #[error("failed to read pixel source: {0}")]
    Extraction(std::io::Error),

    /// The pixel source is not a decodable image.
    #[error(transparent)]
    Decode(RasterError),

    /// The selected backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The transformed image could not be written to the surface.
    #[error("failed to write output surface: {0}")]
    Write(std::io::Error),
}

/// Timing record for one successful dispatch.
#[derive(Debug, Clone)]
pub struct BackendResult {
    /// Backend that ran.
    pub backend: BackendId,
    /// Wall-clock duration of the transform call, in milliseconds.
    pub elapsed_ms: f64,
}

/// Decode `source`, run `backend` once, and write the result to
/// `output`.
///
/// The timing window covers exactly the transform call — for the remote
/// backend that includes its serialization and round-trip, which *are*
/// its transform. On any failure before the final write, `output` is
/// left untouched.
pub fn run_one(
    source: &Path,
    backend: &mut dyn Backend,
    output: &Path,
) -> Result<BackendResult, DispatchError> {
    let bytes = std::fs::read(source).map_err(DispatchError::Extraction)?;
    let image = RasterImage::decode(&bytes).map_err(DispatchError::Decode)?;

    let timer = Timer::start();
    let transformed = backend.transform(image)?;
    let elapsed_ms = timer.elapsed_ms();

    std::fs::write(output, transformed.encode_png()).map_err(DispatchError::Write)?;

    Ok(BackendResult {
        backend: backend.id(),
        elapsed_ms,
    })
}
