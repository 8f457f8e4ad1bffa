//! Sandboxed Backend
//!
//! Runs the kernel inside an isolated worker process behind a
//! value-passing IPC boundary. Readiness lives in the handle itself —
//! construction spawns nothing, and `transform` before `initialize`
//! fails with `NotReady` without touching any buffer.

use crate::backend::{Backend, BackendError};
use crate::supervisor::{SupervisorError, WorkerHandle};
use shadebench_core::{BackendId, RasterImage};
use std::path::PathBuf;
use std::time::Duration;

/// Grayscale execution inside a pre-initialized worker process.
pub struct SandboxedBackend {
    binary: Option<PathBuf>,
    reply_timeout: Duration,
    worker: Option<WorkerHandle>,
}

impl SandboxedBackend {
    /// Create an uninitialized backend that will spawn the current
    /// executable as its worker.
    pub fn new(reply_timeout: Duration) -> Self {
        Self {
            binary: None,
            reply_timeout,
            worker: None,
        }
    }

    /// Create an uninitialized backend with an explicit worker binary
    /// (used by tests, where the current executable is the test harness).
    pub fn with_binary(binary: PathBuf, reply_timeout: Duration) -> Self {
        Self {
            binary: Some(binary),
            reply_timeout,
            worker: None,
        }
    }

    /// One-time initialization: spawn the worker, complete the
    /// handshake, and warm it up with a tiny dummy frame so the first
    /// measured transform does not pay start-up costs (the same warm-up
    /// buffer the reference harness uses).
    pub fn initialize(&mut self) -> Result<(), SupervisorError> {
        let mut worker = match &self.binary {
            Some(binary) => WorkerHandle::spawn_binary(binary, self.reply_timeout)?,
            None => WorkerHandle::spawn(self.reply_timeout)?,
        };

        let warmup = RasterImage::new(2, 1, vec![255, 128, 64, 255, 100, 200, 50, 255]);
        worker.transform(&warmup)?;

        self.worker = Some(worker);
        Ok(())
    }

    /// Whether `initialize` has completed.
    pub fn is_ready(&self) -> bool {
        self.worker.is_some()
    }

    /// Gracefully shut the worker down. Safe to call when never
    /// initialized.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.shutdown() {
                tracing::warn!(error = %e, "sandbox worker shutdown failed");
            }
        }
    }
}

impl Backend for SandboxedBackend {
    fn id(&self) -> BackendId {
        BackendId::Sandboxed
    }

    fn transform(&mut self, image: RasterImage) -> Result<RasterImage, BackendError> {
        let worker = self.worker.as_mut().ok_or(BackendError::NotReady)?;

        let pixels = worker
            .transform(&image)
            .map_err(|e| BackendError::Sandbox(e.to_string()))?;

        if pixels.len() != image.pixels().len() {
            return Err(BackendError::Decode(format!(
                "worker returned {} pixel bytes, expected {}",
                pixels.len(),
                image.pixels().len()
            )));
        }

        Ok(RasterImage::new(image.width(), image.height(), pixels))
    }
}
