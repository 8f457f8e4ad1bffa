//! Execution Backends
//!
//! One capability contract, three strategies. The kernel semantics are
//! identical everywhere — the benchmark compares execution strategies,
//! so only the *where* may differ, never the *what*. Each variant owns
//! its own lifecycle state: Local is always ready, Sandboxed carries an
//! explicit readiness handle, Remote is stateless per call.

mod local;
mod remote;
mod sandbox;

pub use local::LocalBackend;
pub use remote::RemoteBackend;
pub use sandbox::SandboxedBackend;

use shadebench_core::{BackendId, RasterImage};
use thiserror::Error;

/// Failures surfaced by a backend invocation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Sandboxed backend used before `initialize` completed.
    #[error("sandbox worker not initialized")]
    NotReady,

    /// The remote service answered with a non-success status.
    #[error("remote backend returned HTTP {status}")]
    Remote {
        /// HTTP status code of the response.
        status: u16,
    },

    /// The remote endpoint could not be reached at the transport level.
    #[error("remote endpoint unreachable: {0}")]
    Unreachable(String),

    /// The sandbox worker failed or its IPC channel broke.
    #[error("sandbox failure: {0}")]
    Sandbox(String),

    /// A reply or response buffer could not be turned back into a
    /// raster of the expected shape.
    #[error("backend response decode failed: {0}")]
    Decode(String),
}

/// A grayscale execution strategy.
///
/// `transform` consumes the input buffer: the Local backend mutates it
/// in place and returns the same allocation, the other two return
/// freshly built buffers. Callers must not assume the input survives
/// unchanged — hand each backend its own copy.
pub trait Backend {
    /// Which strategy this is.
    fn id(&self) -> BackendId;

    /// Apply the grayscale transform.
    fn transform(&mut self, image: RasterImage) -> Result<RasterImage, BackendError>;
}
