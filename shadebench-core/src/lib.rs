#![warn(missing_docs)]
//! Shadebench Core - Pixel Processing Runtime
//!
//! This crate provides the pieces shared by every execution backend:
//! - `RasterImage` pixel buffers with decode/encode adapters
//! - The grayscale kernel (identical arithmetic for all backends)
//! - Wall-clock timing for transform invocations
//! - The sandbox worker runtime (the worker side of the isolation boundary)

mod filter;
mod measure;
mod raster;
mod worker;

pub use filter::grayscale_in_place;
pub use measure::{Timer, duration_ms};
pub use raster::{BYTES_PER_PIXEL, RasterError, RasterImage};
pub use worker::WorkerMain;

use std::fmt;

/// One of the three interchangeable execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BackendId {
    /// Runs the kernel on the calling thread.
    Local,
    /// Runs the kernel in an isolated worker process behind a
    /// value-passing boundary.
    Sandboxed,
    /// Delegates to the remote filter service over HTTP.
    Remote,
}

impl BackendId {
    /// The fixed measurement order within one image: Local, then
    /// Sandboxed, then Remote. Timing comparisons rely on this order
    /// never changing.
    pub const ORDERED: [BackendId; 3] = [BackendId::Local, BackendId::Sandboxed, BackendId::Remote];

    /// Short lowercase label used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            BackendId::Local => "local",
            BackendId::Sandboxed => "sandboxed",
            BackendId::Remote => "remote",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
