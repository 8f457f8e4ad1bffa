//! In-Process Backend

use crate::backend::{Backend, BackendError};
use shadebench_core::{BackendId, RasterImage, grayscale_in_place};

/// Runs the kernel on the calling thread. Always ready, never suspends,
/// mutates the buffer in place.
#[derive(Debug, Default)]
pub struct LocalBackend;

impl LocalBackend {
    /// Create a local backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for LocalBackend {
    fn id(&self) -> BackendId {
        BackendId::Local
    }

    fn transform(&mut self, mut image: RasterImage) -> Result<RasterImage, BackendError> {
        grayscale_in_place(image.pixels_mut());
        Ok(image)
    }
}
